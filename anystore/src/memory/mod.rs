//! In-memory reference backend.
//!
//! [`MemoryRepository`] keeps entities in a [`MemoryStore`] and answers the
//! built-in query shapes through the handlers of [`MemoryModule`]. Queries
//! serialize each candidate with `serde_json` and evaluate criteria against
//! that document, then page with [`OffsetPaginator`](crate::continuation::OffsetPaginator).
//!
//! Paging is best-effort: every page re-reads the live store, so writes
//! between two pages can shift items across the page boundary.

mod handlers;
mod repository;
mod store;

pub use handlers::*;
pub use repository::*;
pub use store::*;
