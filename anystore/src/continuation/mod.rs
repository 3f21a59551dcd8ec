//! Continuation-token paging.
//!
//! A continuation token is an opaque string that lets a caller resume a query
//! where the previous page stopped. The string is produced and consumed only by
//! a [`ContinuationTokenEncoder`]; callers must round-trip it untouched.
//!
//! - [`ContinuationState`] - the typed cursor a backend needs (offset, native cursor, page number)
//! - [`Base64JsonEncoder`] - the reference encoder, pure and restart-safe
//! - [`ContinuationEnumerable`] - one page of results plus the next token
//! - [`OffsetPaginator`] - the offset/limit paging algorithm for snapshot-queryable backends

mod encoder;
mod enumerable;
mod paging;
mod token;

pub use encoder::*;
pub use enumerable::*;
pub use paging::*;
pub use token::*;
