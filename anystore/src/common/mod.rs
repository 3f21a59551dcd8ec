//! Shared constants, cancellation helpers and small utilities.

mod cancel;
mod constants;
mod sort_order;
mod time;

pub use cancel::*;
pub use constants::*;
pub use sort_order::*;
pub use time::*;
