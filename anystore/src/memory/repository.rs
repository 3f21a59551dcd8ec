use crate::common::ensure_not_cancelled;
use crate::config::RepositoryConfig;
use crate::continuation::ContinuationEnumerable;
use crate::entity::{Entity, EntityStamps};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::handler::{HandlerModule, HandlerRegistry, HandlerRegistryBuilder, QueryHandlerExecutor};
use crate::memory::{MemoryModule, MemoryStore};
use crate::query::Query;
use crate::repository::{
    AddOrUpdateResult, RepositoryAdd, RepositoryAddOrUpdate, RepositoryFind, RepositoryGet,
    RepositoryRemove, RepositoryUpdate,
};
use async_trait::async_trait;
use std::ops::Deref;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Full repository over a [`MemoryStore`].
///
/// Ids are generated on add when missing, and every successful mutation
/// receives a fresh ETag and timestamp from the configured [`EntityStamps`].
/// Updates that carry an ETag are checked against the stored one.
///
/// # Examples
///
/// ```rust,ignore
/// let repository = MemoryRepository::<Order>::new()?;
/// let order = repository.add(Order::default(), &cancel).await?;
/// assert!(!order.id.is_empty());
/// ```
pub struct MemoryRepository<T: Entity> {
    inner: Arc<MemoryRepositoryInner<T>>,
}

impl<T: Entity> Clone for MemoryRepository<T> {
    fn clone(&self) -> Self {
        MemoryRepository {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Entity> MemoryRepository<T> {
    /// A repository with default config, generators and only the built-in handlers.
    pub fn new() -> StoreResult<Self> {
        MemoryRepositoryBuilder::new().build()
    }

    pub fn builder() -> MemoryRepositoryBuilder<T> {
        MemoryRepositoryBuilder::new()
    }
}

impl<T: Entity> Deref for MemoryRepository<T> {
    type Target = MemoryRepositoryInner<T>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

pub struct MemoryRepositoryInner<T: Entity> {
    store: MemoryStore<T>,
    stamps: EntityStamps<T>,
    executor: QueryHandlerExecutor<T>,
    config: RepositoryConfig,
}

impl<T: Entity> MemoryRepositoryInner<T> {
    pub fn store(&self) -> &MemoryStore<T> {
        &self.store
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandlerRegistry {
        self.executor.registry()
    }

    fn insert(&self, mut entity: T, cancel: &CancellationToken) -> StoreResult<T> {
        ensure_not_cancelled(cancel, "add")?;
        if self.stamps.assign_id(&mut entity) {
            log::debug!("Generated id '{}' for '{}'", entity.id(), T::entity_name());
        }
        self.stamps.stamp(&mut entity);
        ensure_not_cancelled(cancel, "add")?;
        self.store.insert(entity.clone())?;
        Ok(entity)
    }

    fn replace(&self, mut entity: T, cancel: &CancellationToken) -> StoreResult<T> {
        ensure_not_cancelled(cancel, "update")?;
        if !entity.has_id() {
            log::error!("Cannot update '{}' without an id", T::entity_name());
            return Err(StoreError::new(
                &format!("Cannot update '{}' without an id", T::entity_name()),
                ErrorKind::NotFound,
            ));
        }
        let expected_etag = entity.etag().map(str::to_string);
        self.stamps.stamp(&mut entity);
        ensure_not_cancelled(cancel, "update")?;
        self.store.replace(entity.clone(), expected_etag.as_deref())?;
        Ok(entity)
    }
}

#[async_trait]
impl<T: Entity> RepositoryAdd<T> for MemoryRepository<T> {
    async fn add(&self, entity: T, cancel: &CancellationToken) -> StoreResult<T> {
        self.insert(entity, cancel)
    }
}

#[async_trait]
impl<T: Entity> RepositoryGet<T> for MemoryRepository<T> {
    async fn try_get_by_id(&self, id: &str, cancel: &CancellationToken) -> StoreResult<Option<T>> {
        ensure_not_cancelled(cancel, "get")?;
        Ok(self.store.get(id))
    }
}

#[async_trait]
impl<T: Entity> RepositoryUpdate<T> for MemoryRepository<T> {
    async fn update(&self, entity: T, cancel: &CancellationToken) -> StoreResult<T> {
        self.replace(entity, cancel)
    }

    fn max_update_retries(&self) -> usize {
        self.config.max_update_retries()
    }
}

#[async_trait]
impl<T: Entity> RepositoryAddOrUpdate<T> for MemoryRepository<T> {
    async fn add_or_update(
        &self,
        entity: T,
        cancel: &CancellationToken,
    ) -> StoreResult<AddOrUpdateResult<T>> {
        if entity.has_id() && self.store.contains(entity.id()) {
            self.replace(entity, cancel).map(AddOrUpdateResult::updated)
        } else {
            self.insert(entity, cancel).map(AddOrUpdateResult::added)
        }
    }
}

#[async_trait]
impl<T: Entity> RepositoryRemove<T> for MemoryRepository<T> {
    async fn try_remove(&self, id: &str, cancel: &CancellationToken) -> StoreResult<bool> {
        ensure_not_cancelled(cancel, "remove")?;
        Ok(self.store.remove(id))
    }
}

#[async_trait]
impl<T: Entity> RepositoryFind<T> for MemoryRepository<T> {
    async fn find<Q, R>(
        &self,
        query: &Q,
        cancel: &CancellationToken,
    ) -> StoreResult<ContinuationEnumerable<R>>
    where
        Q: Query,
        R: Send + 'static,
    {
        self.executor.execute::<R, Q>(query, cancel).await
    }
}

/// Assembles a [`MemoryRepository`].
///
/// Extra [`HandlerModule`]s are loaded after the built-in [`MemoryModule`];
/// a module that registers a signature the memory module already covers
/// makes [`build`](MemoryRepositoryBuilder::build) fail with
/// `InvalidOperation`.
pub struct MemoryRepositoryBuilder<T: Entity> {
    config: RepositoryConfig,
    stamps: EntityStamps<T>,
    store: MemoryStore<T>,
    modules: Vec<Box<dyn HandlerModule>>,
}

impl<T: Entity> Default for MemoryRepositoryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MemoryRepositoryBuilder<T> {
    pub fn new() -> Self {
        MemoryRepositoryBuilder {
            config: RepositoryConfig::default(),
            stamps: EntityStamps::default(),
            store: MemoryStore::new(),
            modules: Vec::new(),
        }
    }

    pub fn config(mut self, config: RepositoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn stamps(mut self, stamps: EntityStamps<T>) -> Self {
        self.stamps = stamps;
        self
    }

    /// Uses an existing store, e.g. to share data between repositories.
    pub fn store(mut self, store: MemoryStore<T>) -> Self {
        self.store = store;
        self
    }

    /// The store the repository will use; custom handlers capture a clone of it.
    pub fn store_handle(&self) -> MemoryStore<T> {
        self.store.clone()
    }

    pub fn load_module<M: HandlerModule + 'static>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn build(self) -> StoreResult<MemoryRepository<T>> {
        let mut registry = HandlerRegistryBuilder::new(self.config.backend_name());
        registry.load_module(&MemoryModule::new(self.store.clone()))?;
        for module in &self.modules {
            registry.load_module(module.as_ref())?;
        }

        Ok(MemoryRepository {
            inner: Arc::new(MemoryRepositoryInner {
                store: self.store,
                stamps: self.stamps,
                executor: QueryHandlerExecutor::new(registry.build()),
                config: self.config,
            }),
        })
    }
}
