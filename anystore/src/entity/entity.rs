use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Last-modified marker carried by entities.
pub type Timestamp = DateTime<Utc>;

/// A domain object with a stable identity.
///
/// # Purpose
/// Gives the repository layer uniform access to the identity (`id`), the
/// optimistic concurrency token (`etag`) and the last-modified marker
/// (`timestamp`) of any stored type. Property-level access for queries goes
/// through the serde representation, hence the `Serialize`/`DeserializeOwned`
/// bounds.
///
/// # Characteristics
/// - `id` is empty until assigned; repositories generate one on add when empty
/// - `etag` and `timestamp` are optional capabilities: the default accessors
///   report `None` and ignore writes, for entities that do not track them
/// - `Default` is required so that mirror queries can tell which properties
///   of a prototype were explicitly set
///
/// Typically implemented with `#[derive(Entity)]` from `anystore_derive`.
pub trait Entity: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Returns the logical entity name (e.g. "orders").
    fn entity_name() -> &'static str;

    /// Returns the identity, empty when not yet assigned.
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    fn etag(&self) -> Option<&str> {
        None
    }

    fn set_etag(&mut self, _etag: Option<String>) {}

    fn timestamp(&self) -> Option<Timestamp> {
        None
    }

    fn set_timestamp(&mut self, _timestamp: Option<Timestamp>) {}

    #[inline]
    fn has_id(&self) -> bool {
        !self.id().is_empty()
    }
}
