use crate::entity::{Entity, SnowflakeIdGenerator, Timestamp};
use chrono::Utc;
use std::sync::Arc;

/// Produces a fresh identity for an entity created without one.
pub trait IdGenerator<T>: Send + Sync {
    fn generate(&self, entity: &T) -> String;
}

/// Produces the opaque concurrency token stored after every mutation.
pub trait ETagGenerator<T>: Send + Sync {
    fn generate(&self, entity: &T) -> String;
}

/// Supplies the last-modified marker written on add and update.
pub trait TimestampProvider: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Random v4 UUID identities.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl<T> IdGenerator<T> for UuidIdGenerator {
    fn generate(&self, _entity: &T) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

impl<T> IdGenerator<T> for SnowflakeIdGenerator {
    fn generate(&self, _entity: &T) -> String {
        self.get_id().to_string()
    }
}

/// Random v4 UUID etags, hyphens stripped.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidETagGenerator;

impl<T> ETagGenerator<T> for UuidETagGenerator {
    fn generate(&self, _entity: &T) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimestampProvider;

impl TimestampProvider for SystemTimestampProvider {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// The generator set a repository uses to stamp entities.
///
/// Defaults to time-ordered snowflake ids, UUID etags and the system clock.
///
/// # Examples
///
/// ```rust,ignore
/// let stamps = EntityStamps::<Order>::default().with_id_generator(UuidIdGenerator);
/// ```
pub struct EntityStamps<T> {
    id_generator: Arc<dyn IdGenerator<T>>,
    etag_generator: Arc<dyn ETagGenerator<T>>,
    timestamp_provider: Arc<dyn TimestampProvider>,
}

impl<T> Clone for EntityStamps<T> {
    fn clone(&self) -> Self {
        EntityStamps {
            id_generator: self.id_generator.clone(),
            etag_generator: self.etag_generator.clone(),
            timestamp_provider: self.timestamp_provider.clone(),
        }
    }
}

impl<T: Entity> Default for EntityStamps<T> {
    fn default() -> Self {
        EntityStamps {
            id_generator: Arc::new(SnowflakeIdGenerator::new()),
            etag_generator: Arc::new(UuidETagGenerator),
            timestamp_provider: Arc::new(SystemTimestampProvider),
        }
    }
}

impl<T: Entity> EntityStamps<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_generator(mut self, generator: impl IdGenerator<T> + 'static) -> Self {
        self.id_generator = Arc::new(generator);
        self
    }

    pub fn with_etag_generator(mut self, generator: impl ETagGenerator<T> + 'static) -> Self {
        self.etag_generator = Arc::new(generator);
        self
    }

    pub fn with_timestamp_provider(mut self, provider: impl TimestampProvider + 'static) -> Self {
        self.timestamp_provider = Arc::new(provider);
        self
    }

    /// Assigns a generated id when the entity has none. Returns `true` if one was assigned.
    pub fn assign_id(&self, entity: &mut T) -> bool {
        if entity.has_id() {
            return false;
        }
        let id = self.id_generator.generate(entity);
        entity.set_id(id);
        true
    }

    /// Writes a fresh etag and the current timestamp.
    pub fn stamp(&self, entity: &mut T) {
        let etag = self.etag_generator.generate(entity);
        entity.set_etag(Some(etag));
        entity.set_timestamp(Some(self.timestamp_provider.now()));
    }
}
