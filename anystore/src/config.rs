use crate::common::{DEFAULT_LIMIT, DEFAULT_MAX_UPDATE_RETRIES, MEMORY_BACKEND};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use std::ops::Deref;
use std::sync::Arc;

/// Settings shared by a repository and the queries built against it.
///
/// The config is immutable once built and cheap to clone.
///
/// # Examples
///
/// ```rust
/// use anystore::config::RepositoryConfig;
///
/// let config = RepositoryConfig::builder()
///     .default_limit(20)
///     .max_update_retries(5)
///     .build()
///     .unwrap();
/// assert_eq!(config.default_limit(), 20);
/// assert_eq!(config.backend_name(), "memory");
/// ```
#[derive(Clone, Debug)]
pub struct RepositoryConfig {
    inner: Arc<RepositoryConfigInner>,
}

impl RepositoryConfig {
    pub fn builder() -> RepositoryConfigBuilder {
        RepositoryConfigBuilder::new()
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            inner: Arc::new(RepositoryConfigInner::default()),
        }
    }
}

impl Deref for RepositoryConfig {
    type Target = RepositoryConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Clone, Debug)]
pub struct RepositoryConfigInner {
    default_limit: usize,
    max_update_retries: usize,
    backend_name: String,
}

impl Default for RepositoryConfigInner {
    fn default() -> Self {
        RepositoryConfigInner {
            default_limit: DEFAULT_LIMIT,
            max_update_retries: DEFAULT_MAX_UPDATE_RETRIES,
            backend_name: MEMORY_BACKEND.to_string(),
        }
    }
}

impl RepositoryConfigInner {
    /// Page size used when a query is built from this config.
    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Retry budget for read-latest-then-update loops.
    pub fn max_update_retries(&self) -> usize {
        self.max_update_retries
    }

    /// Backend name reported in dispatch diagnostics.
    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }
}

/// Builder for [`RepositoryConfig`].
///
/// The first invalid setting is captured and returned from
/// [`build`](RepositoryConfigBuilder::build); later settings are ignored.
#[derive(Default)]
pub struct RepositoryConfigBuilder {
    error: Option<StoreError>,
    config: RepositoryConfigInner,
}

impl RepositoryConfigBuilder {
    pub fn new() -> Self {
        RepositoryConfigBuilder {
            error: None,
            config: RepositoryConfigInner::default(),
        }
    }

    pub fn default_limit(mut self, limit: usize) -> Self {
        if self.error.is_none() {
            if limit == 0 {
                log::error!("Default limit must be greater than zero");
                self.error = Some(StoreError::new(
                    "Default limit must be greater than zero",
                    ErrorKind::BadInput,
                ));
            } else {
                self.config.default_limit = limit;
            }
        }
        self
    }

    pub fn max_update_retries(mut self, retries: usize) -> Self {
        if self.error.is_none() {
            self.config.max_update_retries = retries;
        }
        self
    }

    pub fn backend_name(mut self, name: &str) -> Self {
        if self.error.is_none() {
            if name.trim().is_empty() {
                log::error!("Backend name cannot be empty");
                self.error = Some(StoreError::new(
                    "Backend name cannot be empty",
                    ErrorKind::BadInput,
                ));
            } else {
                self.config.backend_name = name.to_string();
            }
        }
        self
    }

    pub fn build(self) -> StoreResult<RepositoryConfig> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(RepositoryConfig {
            inner: Arc::new(self.config),
        })
    }
}
