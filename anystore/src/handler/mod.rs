//! Query handler dispatch.
//!
//! A backend supports a query shape by registering a [`QueryHandler`] for the
//! triple (entity type, query type, result type). Registration happens once,
//! through a [`HandlerRegistryBuilder`]; the resulting [`HandlerRegistry`] is
//! immutable and shared by every [`QueryHandlerExecutor`] built from it.
//!
//! ```text
//! find(&query) ──► QueryHandlerExecutor<E>::execute::<R, Q>
//!                      │  signature = (E, R, Q)
//!                      ▼
//!                  HandlerRegistry ──miss──► UnsupportedFeature
//!                      │ hit
//!                      ▼
//!                  QueryHandler<E, Q, R>::execute ──► ContinuationEnumerable<R>
//! ```

mod executor;
mod handler;
mod registry;
mod signature;

pub use executor::*;
pub use handler::*;
pub use registry::*;
pub use signature::*;
