use crate::continuation::ContinuationEnumerable;
use crate::errors::StoreResult;
use crate::query::Query;
use async_trait::async_trait;
use std::marker::PhantomData;
use tokio_util::sync::CancellationToken;

/// Executes one query shape against one backend.
///
/// Handlers are stateless between invocations; whatever they need (a store
/// handle, a client) is captured at construction and shared read-only.
#[async_trait]
pub trait QueryHandler<E, Q, R>: Send + Sync
where
    Q: Query,
{
    async fn execute(
        &self,
        query: &Q,
        cancel: &CancellationToken,
    ) -> StoreResult<ContinuationEnumerable<R>>;
}

/// Adapts a synchronous closure into a [`QueryHandler`].
///
/// Useful for backends whose native access path does not suspend, and for
/// tests.
///
/// # Examples
///
/// ```rust
/// use anystore::continuation::ContinuationEnumerable;
/// use anystore::handler::handler_fn;
/// use anystore::query::AllQuery;
///
/// let handler = handler_fn(|_query: &AllQuery, _cancel| {
///     Ok(ContinuationEnumerable::new(vec![1, 2, 3], None))
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<Q, R, F>(f: F) -> FnHandler<Q, R, F>
where
    F: Fn(&Q, &CancellationToken) -> StoreResult<ContinuationEnumerable<R>> + Send + Sync,
{
    FnHandler {
        f,
        _phantom: PhantomData,
    }
}

pub struct FnHandler<Q, R, F> {
    f: F,
    _phantom: PhantomData<fn(&Q) -> R>,
}

#[async_trait]
impl<E, Q, R, F> QueryHandler<E, Q, R> for FnHandler<Q, R, F>
where
    Q: Query,
    R: Send,
    F: Fn(&Q, &CancellationToken) -> StoreResult<ContinuationEnumerable<R>> + Send + Sync,
{
    async fn execute(
        &self,
        query: &Q,
        cancel: &CancellationToken,
    ) -> StoreResult<ContinuationEnumerable<R>> {
        (self.f)(query, cancel)
    }
}
