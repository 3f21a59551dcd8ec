use crate::common::ensure_not_cancelled;
use crate::continuation::{ContinuationEnumerable, OffsetPaginator};
use crate::entity::Entity;
use crate::errors::StoreResult;
use crate::handler::{HandlerModule, HandlerRegistryBuilder, QueryHandler};
use crate::memory::MemoryStore;
use crate::query::{AllQuery, CriteriaMatcher, CriteriaQuery, MirrorMatcher, MirrorQuery, Query};
use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Pairs each entity with its serialized form for criteria evaluation.
fn documents<T: Entity>(entities: Vec<T>) -> StoreResult<Vec<(Value, T)>> {
    entities
        .into_iter()
        .map(|entity| Ok((serde_json::to_value(&entity)?, entity)))
        .collect()
}

/// Answers [`AllQuery`] in insertion order.
pub struct MemoryAllHandler<T> {
    store: MemoryStore<T>,
    paginator: OffsetPaginator,
}

impl<T: Entity> MemoryAllHandler<T> {
    pub fn new(store: MemoryStore<T>) -> Self {
        MemoryAllHandler {
            store,
            paginator: OffsetPaginator::new(),
        }
    }
}

#[async_trait]
impl<T: Entity> QueryHandler<T, AllQuery, T> for MemoryAllHandler<T> {
    async fn execute(
        &self,
        query: &AllQuery,
        cancel: &CancellationToken,
    ) -> StoreResult<ContinuationEnumerable<T>> {
        ensure_not_cancelled(cancel, "find")?;
        self.paginator.page(query.options(), self.store.snapshot())
    }
}

/// Answers [`MirrorQuery`] by equality on the prototype's non-default properties.
pub struct MemoryMirrorHandler<T> {
    store: MemoryStore<T>,
    paginator: OffsetPaginator,
}

impl<T: Entity> MemoryMirrorHandler<T> {
    pub fn new(store: MemoryStore<T>) -> Self {
        MemoryMirrorHandler {
            store,
            paginator: OffsetPaginator::new(),
        }
    }
}

#[async_trait]
impl<T: Entity> QueryHandler<T, MirrorQuery<T>, T> for MemoryMirrorHandler<T> {
    async fn execute(
        &self,
        query: &MirrorQuery<T>,
        cancel: &CancellationToken,
    ) -> StoreResult<ContinuationEnumerable<T>> {
        ensure_not_cancelled(cancel, "find")?;
        let matcher = MirrorMatcher::from_prototype(query.prototype())?;
        let candidates = matcher.apply(documents(self.store.snapshot())?);
        self.paginator.page(query.options(), candidates)
    }
}

/// Answers [`CriteriaQuery`], filtering then sorting before paging.
pub struct MemoryCriteriaHandler<T> {
    store: MemoryStore<T>,
    paginator: OffsetPaginator,
}

impl<T: Entity> MemoryCriteriaHandler<T> {
    pub fn new(store: MemoryStore<T>) -> Self {
        MemoryCriteriaHandler {
            store,
            paginator: OffsetPaginator::new(),
        }
    }
}

#[async_trait]
impl<T: Entity> QueryHandler<T, CriteriaQuery, T> for MemoryCriteriaHandler<T> {
    async fn execute(
        &self,
        query: &CriteriaQuery,
        cancel: &CancellationToken,
    ) -> StoreResult<ContinuationEnumerable<T>> {
        ensure_not_cancelled(cancel, "find")?;
        let matcher = CriteriaMatcher::compile(query)?;
        let candidates = matcher.apply(documents(self.store.snapshot())?);
        self.paginator.page(query.options(), candidates)
    }
}

/// Registers the built-in memory handlers for one store.
pub struct MemoryModule<T> {
    store: MemoryStore<T>,
}

impl<T: Entity> MemoryModule<T> {
    pub fn new(store: MemoryStore<T>) -> Self {
        MemoryModule { store }
    }
}

impl<T: Entity> HandlerModule for MemoryModule<T> {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self, registrar: &mut HandlerRegistryBuilder) -> StoreResult<()> {
        registrar.register::<T, AllQuery, T, _>(MemoryAllHandler::new(self.store.clone()))?;
        registrar.register::<T, MirrorQuery<T>, T, _>(MemoryMirrorHandler::new(self.store.clone()))?;
        registrar.register::<T, CriteriaQuery, T, _>(MemoryCriteriaHandler::new(self.store.clone()))?;
        Ok(())
    }
}
