//! # anystore - storage-agnostic repositories
//!
//! anystore gives application code one repository contract per entity type:
//! CRUD plus paginated queries. The persistence engine behind it can be
//! swapped without touching callers.
//!
//! ## Key Features
//!
//! - **Continuation tokens**: opaque, URL-safe, restart-safe paging cursors
//! - **Query dispatch**: any query shape is served once a handler for
//!   `(entity, query, result)` is registered; missing registrations fail
//!   with a descriptive `UnsupportedFeature` error
//! - **Decorators**: validation, domain events and logging layered around any
//!   repository without changing its contract
//! - **Optimistic concurrency**: ETag checks on update plus a bounded
//!   read-latest-and-retry helper
//! - **In-memory backend**: a complete reference implementation used for
//!   tests and prototyping
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use anystore::memory::MemoryRepository;
//! use anystore::query::{property, CriteriaQuery};
//! use anystore::repository::*;
//! use tokio_util::sync::CancellationToken;
//!
//! let cancel = CancellationToken::new();
//! let orders = MemoryRepository::<Order>::new()?;
//! let order = orders.add(Order::new("acme", 120), &cancel).await?;
//!
//! let query = CriteriaQuery::new().filter(property("customer").eq("acme"));
//! let page = orders.find::<_, Order>(&query, &cancel).await?;
//! for order in &page {
//!     println!("{}", order.id);
//! }
//! if let Some(token) = page.continuation_token() {
//!     // hand the token back to fetch the next page
//! }
//! ```
//!
//! ## Modules
//!
//! - [`common`] - constants, cancellation and sort helpers
//! - [`config`] - repository configuration
//! - [`continuation`] - continuation tokens, encoders and paging
//! - [`decorator`] - repository decorators and the decorator builder
//! - [`entity`] - the entity capability and id/etag/timestamp generators
//! - [`errors`] - error kinds and the shared error type
//! - [`handler`] - query handler registry and executor
//! - [`memory`] - in-memory reference backend
//! - [`query`] - query descriptors and criteria evaluation
//! - [`repository`] - the repository capability traits

pub mod common;
pub mod config;
pub mod continuation;
pub mod decorator;
pub mod entity;
pub mod errors;
pub mod handler;
pub mod memory;
pub mod query;
pub mod repository;

#[cfg(test)]
#[ctor::ctor]
fn init() {
    colog::init();
}
