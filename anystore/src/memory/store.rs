use crate::entity::Entity;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Insertion-ordered entity map shared by a repository and its handlers.
///
/// Every method takes the lock for the duration of a single call; there is
/// no way to hold it across an await point.
pub struct MemoryStore<T> {
    entries: Arc<RwLock<IndexMap<String, T>>>,
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        MemoryStore {
            entries: self.entries.clone(),
        }
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MemoryStore<T> {
    pub fn new() -> Self {
        MemoryStore {
            entries: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.entries.read().get(id).cloned()
    }

    /// Inserts a new entity; fails with `Conflict` if the id exists.
    pub fn insert(&self, entity: T) -> StoreResult<()> {
        let mut entries = self.entries.write();
        if entries.contains_key(entity.id()) {
            log::error!(
                "Entity '{}' with id '{}' already exists",
                T::entity_name(),
                entity.id()
            );
            return Err(StoreError::new(
                &format!(
                    "Entity '{}' with id '{}' already exists",
                    T::entity_name(),
                    entity.id()
                ),
                ErrorKind::Conflict,
            ));
        }
        entries.insert(entity.id().to_string(), entity);
        Ok(())
    }

    /// Replaces an existing entity in place.
    ///
    /// When `expected_etag` is given, the stored entity must still carry it;
    /// otherwise the write is rejected with `Concurrency`.
    pub fn replace(&self, entity: T, expected_etag: Option<&str>) -> StoreResult<()> {
        let mut entries = self.entries.write();
        let current = match entries.get_mut(entity.id()) {
            Some(current) => current,
            None => {
                log::error!(
                    "Entity '{}' with id '{}' not found",
                    T::entity_name(),
                    entity.id()
                );
                return Err(StoreError::new(
                    &format!(
                        "Entity '{}' with id '{}' not found",
                        T::entity_name(),
                        entity.id()
                    ),
                    ErrorKind::NotFound,
                ));
            }
        };

        if let Some(expected) = expected_etag {
            if current.etag() != Some(expected) {
                log::error!(
                    "Entity '{}' with id '{}' was modified concurrently (expected etag '{}')",
                    T::entity_name(),
                    entity.id(),
                    expected
                );
                return Err(StoreError::new(
                    &format!(
                        "Entity '{}' with id '{}' was modified concurrently",
                        T::entity_name(),
                        entity.id()
                    ),
                    ErrorKind::Concurrency,
                ));
            }
        }

        *current = entity;
        Ok(())
    }

    /// Removes an entity, keeping the order of the rest. Returns `false` on a miss.
    pub fn remove(&self, id: &str) -> bool {
        self.entries.write().shift_remove(id).is_some()
    }

    /// Clones every entity in insertion order.
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.read().values().cloned().collect()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
