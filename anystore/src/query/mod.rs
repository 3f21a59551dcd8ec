//! Backend-agnostic query descriptors and the criteria primitives handlers evaluate.
//!
//! # Query shapes
//!
//! - [`AllQuery`] - every entity, in the backend's natural order
//! - [`MirrorQuery`] - equality against the explicitly-set properties of a prototype entity
//! - [`CriteriaQuery`] - an ordered list of [`Criterion`] plus order-by clauses
//!
//! Backends may define their own query types; any type implementing [`Query`]
//! can be dispatched once a handler is registered for it.
//!
//! # Examples
//!
//! ```rust
//! use anystore::query::{asc, property, CriteriaQuery, Query};
//!
//! let query = CriteriaQuery::new()
//!     .filter(property("Lines[].Name").eq("widget"))
//!     .filter(property("Total").gte(100))
//!     .order_by(asc("Customer"))
//!     .with_limit(20);
//! assert_eq!(query.limit(), 20);
//! ```

mod criterion;
mod matching;
mod property_path;
mod query;

pub use criterion::*;
pub use matching::*;
pub use property_path::*;
pub use query::*;
