use crate::continuation::ContinuationEnumerable;
use crate::decorator::Decorator;
use crate::entity::Entity;
use crate::errors::StoreResult;
use crate::query::Query;
use crate::repository::{
    AddOrUpdateResult, RepositoryAdd, RepositoryAddOrUpdate, RepositoryFind, RepositoryGet,
    RepositoryRemove, RepositoryUpdate,
};
use async_trait::async_trait;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Decorator factory for [`LoggingDecorator`].
pub struct Logging {
    target: &'static str,
}

impl Logging {
    /// `target` prefixes every log line, usually the entity or repository name.
    pub fn new(target: &'static str) -> Self {
        Logging { target }
    }
}

impl<R> Decorator<R> for Logging {
    type Output = LoggingDecorator<R>;

    fn name(&self) -> &'static str {
        "logging"
    }

    fn decorate(self, inner: R) -> Self::Output {
        LoggingDecorator::new(inner, self.target)
    }
}

/// Logs every call with its outcome and elapsed time.
///
/// Successful calls log at `debug`, failures at `warn` with the error kind.
/// Results and errors are returned untouched.
pub struct LoggingDecorator<R> {
    inner: R,
    target: &'static str,
}

impl<R> LoggingDecorator<R> {
    pub fn new(inner: R, target: &'static str) -> Self {
        LoggingDecorator { inner, target }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn observe<V>(&self, operation: &str, started: Instant, result: StoreResult<V>) -> StoreResult<V> {
        let elapsed = started.elapsed();
        match &result {
            Ok(_) => log::debug!("[{}] {} completed in {:?}", self.target, operation, elapsed),
            Err(e) => log::warn!(
                "[{}] {} failed after {:?} ({}): {}",
                self.target,
                operation,
                elapsed,
                e.kind(),
                e.message()
            ),
        }
        result
    }
}

#[async_trait]
impl<T: Entity, R: RepositoryAdd<T>> RepositoryAdd<T> for LoggingDecorator<R> {
    async fn add(&self, entity: T, cancel: &CancellationToken) -> StoreResult<T> {
        let started = Instant::now();
        let result = self.inner.add(entity, cancel).await;
        self.observe("add", started, result)
    }
}

#[async_trait]
impl<T: Entity, R: RepositoryGet<T>> RepositoryGet<T> for LoggingDecorator<R> {
    async fn try_get_by_id(&self, id: &str, cancel: &CancellationToken) -> StoreResult<Option<T>> {
        let started = Instant::now();
        let result = self.inner.try_get_by_id(id, cancel).await;
        self.observe(&format!("get '{}'", id), started, result)
    }
}

#[async_trait]
impl<T: Entity, R: RepositoryUpdate<T>> RepositoryUpdate<T> for LoggingDecorator<R> {
    async fn update(&self, entity: T, cancel: &CancellationToken) -> StoreResult<T> {
        let operation = format!("update '{}'", entity.id());
        let started = Instant::now();
        let result = self.inner.update(entity, cancel).await;
        self.observe(&operation, started, result)
    }

    fn max_update_retries(&self) -> usize {
        self.inner.max_update_retries()
    }
}

#[async_trait]
impl<T: Entity, R: RepositoryAddOrUpdate<T>> RepositoryAddOrUpdate<T> for LoggingDecorator<R> {
    async fn add_or_update(
        &self,
        entity: T,
        cancel: &CancellationToken,
    ) -> StoreResult<AddOrUpdateResult<T>> {
        let started = Instant::now();
        let result = self.inner.add_or_update(entity, cancel).await;
        self.observe("add_or_update", started, result)
    }
}

#[async_trait]
impl<T: Entity, R: RepositoryRemove<T>> RepositoryRemove<T> for LoggingDecorator<R> {
    async fn try_remove(&self, id: &str, cancel: &CancellationToken) -> StoreResult<bool> {
        let started = Instant::now();
        let result = self.inner.try_remove(id, cancel).await;
        self.observe(&format!("remove '{}'", id), started, result)
    }
}

#[async_trait]
impl<T: Entity, R: RepositoryFind<T>> RepositoryFind<T> for LoggingDecorator<R> {
    async fn find<Q, Out>(
        &self,
        query: &Q,
        cancel: &CancellationToken,
    ) -> StoreResult<ContinuationEnumerable<Out>>
    where
        Q: Query,
        Out: Send + 'static,
    {
        let started = Instant::now();
        let result = self.inner.find::<Q, Out>(query, cancel).await;
        let operation = match &result {
            Ok(page) => format!(
                "find {} ({} items, more: {})",
                std::any::type_name::<Q>(),
                page.len(),
                page.has_more()
            ),
            Err(_) => format!("find {}", std::any::type_name::<Q>()),
        };
        self.observe(&operation, started, result)
    }
}
