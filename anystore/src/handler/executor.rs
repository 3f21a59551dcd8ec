use crate::common::ensure_not_cancelled;
use crate::continuation::ContinuationEnumerable;
use crate::entity::Entity;
use crate::errors::StoreResult;
use crate::handler::HandlerRegistry;
use crate::query::Query;
use std::marker::PhantomData;
use tokio_util::sync::CancellationToken;

/// Runs queries for entity `E` through the handlers of a [`HandlerRegistry`].
///
/// The executor holds no state besides the shared registry, so it can be
/// cloned into every repository instance of the same backend.
pub struct QueryHandlerExecutor<E> {
    registry: HandlerRegistry,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for QueryHandlerExecutor<E> {
    fn clone(&self) -> Self {
        QueryHandlerExecutor {
            registry: self.registry.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> QueryHandlerExecutor<E> {
    pub fn new(registry: HandlerRegistry) -> Self {
        QueryHandlerExecutor {
            registry,
            _entity: PhantomData,
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Resolves the handler for `(E, Q, R)` and returns its page unchanged.
    ///
    /// Fails with `UnsupportedFeature` when nothing is registered for the
    /// triple; the message names the query type, the result type, the entity
    /// and the backend so the missing registration can be found.
    pub async fn execute<R, Q>(
        &self,
        query: &Q,
        cancel: &CancellationToken,
    ) -> StoreResult<ContinuationEnumerable<R>>
    where
        Q: Query,
        R: Send + 'static,
    {
        ensure_not_cancelled(cancel, "find")?;
        let handler = self.registry.resolve::<E, Q, R>()?;
        log::debug!(
            "Dispatching {} for '{}' (limit {}, resumed: {})",
            std::any::type_name::<Q>(),
            E::entity_name(),
            query.limit(),
            query.continuation_token().is_some()
        );
        handler.execute(query, cancel).await
    }
}
