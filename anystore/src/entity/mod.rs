//! The entity capability and the generators that stamp identity, version and
//! modification time onto entities.
//!
//! Any struct can be stored once it implements [`Entity`]. The usual way is the
//! derive macro from `anystore_derive`:
//!
//! ```rust,ignore
//! use anystore::entity::Timestamp;
//! use anystore_derive::Entity;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize, Entity)]
//! #[entity(name = "orders", etag = "etag", timestamp = "modified")]
//! pub struct Order {
//!     pub id: String,
//!     pub etag: Option<String>,
//!     pub modified: Option<Timestamp>,
//!     pub customer: String,
//! }
//! ```

mod entity;
mod generators;
mod snowflake;

pub use entity::*;
pub use generators::*;
pub use snowflake::*;
