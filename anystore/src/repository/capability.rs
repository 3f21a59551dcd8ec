use crate::common::DEFAULT_MAX_UPDATE_RETRIES;
use crate::continuation::ContinuationEnumerable;
use crate::entity::Entity;
use crate::errors::StoreResult;
use crate::query::{AllQuery, Query};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Outcome of [`RepositoryAddOrUpdate::add_or_update`].
#[derive(Debug, Clone, PartialEq)]
pub struct AddOrUpdateResult<T> {
    pub entity: T,
    /// `true` when the call took the add branch.
    pub was_added: bool,
}

impl<T> AddOrUpdateResult<T> {
    pub fn added(entity: T) -> Self {
        AddOrUpdateResult {
            entity,
            was_added: true,
        }
    }

    pub fn updated(entity: T) -> Self {
        AddOrUpdateResult {
            entity,
            was_added: false,
        }
    }

    pub fn into_entity(self) -> T {
        self.entity
    }
}

#[async_trait]
pub trait RepositoryAdd<T: Entity>: Send + Sync {
    /// Creates `entity`, generating an id when it has none.
    ///
    /// Fails with `Conflict` when the id is taken. The returned entity carries
    /// the id, ETag and timestamp the backend assigned.
    async fn add(&self, entity: T, cancel: &CancellationToken) -> StoreResult<T>;
}

#[async_trait]
pub trait RepositoryGet<T: Entity>: Send + Sync {
    /// Looks up an entity; a miss is `Ok(None)`.
    async fn try_get_by_id(&self, id: &str, cancel: &CancellationToken) -> StoreResult<Option<T>>;
}

#[async_trait]
pub trait RepositoryUpdate<T: Entity>: Send + Sync {
    /// Replaces the stored entity with the same id.
    ///
    /// Fails with `NotFound` when the id does not exist and with
    /// `Concurrency` when `entity` carries an ETag that no longer matches
    /// the stored one.
    ///
    /// An `entity` without an ETag skips the version check entirely: the
    /// update succeeds against whatever is stored and the last writer wins.
    /// Callers that need optimistic concurrency must send the ETag they read.
    async fn update(&self, entity: T, cancel: &CancellationToken) -> StoreResult<T>;

    /// Retry budget used by [`RepositoryExt::update_latest`](crate::repository::RepositoryExt::update_latest).
    fn max_update_retries(&self) -> usize {
        DEFAULT_MAX_UPDATE_RETRIES
    }
}

#[async_trait]
pub trait RepositoryAddOrUpdate<T: Entity>: Send + Sync {
    async fn add_or_update(
        &self,
        entity: T,
        cancel: &CancellationToken,
    ) -> StoreResult<AddOrUpdateResult<T>>;
}

#[async_trait]
pub trait RepositoryRemove<T: Entity>: Send + Sync {
    /// Removes an entity; a miss is `Ok(false)`.
    async fn try_remove(&self, id: &str, cancel: &CancellationToken) -> StoreResult<bool>;
}

#[async_trait]
pub trait RepositoryFind<T: Entity>: Send + Sync {
    /// Runs `query` through the registered handler for `(T, Q, R)`.
    async fn find<Q, R>(
        &self,
        query: &Q,
        cancel: &CancellationToken,
    ) -> StoreResult<ContinuationEnumerable<R>>
    where
        Q: Query,
        R: Send + 'static;

    /// One page of every entity, starting at `continuation_token`.
    async fn find_all(
        &self,
        continuation_token: Option<&str>,
        limit: usize,
        cancel: &CancellationToken,
    ) -> StoreResult<ContinuationEnumerable<T>> {
        let query = AllQuery::new()
            .with_limit(limit)
            .with_continuation_token(continuation_token);
        self.find::<AllQuery, T>(&query, cancel).await
    }

    /// Walks every page of [`find_all`](RepositoryFind::find_all) and
    /// collects the items.
    async fn find_all_items(&self, limit: usize, cancel: &CancellationToken) -> StoreResult<Vec<T>> {
        let mut items = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = self.find_all(token.as_deref(), limit, cancel).await?;
            let (page_items, next) = page.into_parts();
            items.extend(page_items);
            match next {
                Some(next) => token = Some(next),
                None => return Ok(items),
            }
        }
    }
}

/// The full repository contract.
pub trait Repository<T: Entity>:
    RepositoryAdd<T>
    + RepositoryGet<T>
    + RepositoryUpdate<T>
    + RepositoryAddOrUpdate<T>
    + RepositoryRemove<T>
    + RepositoryFind<T>
{
}

impl<T, R> Repository<T> for R
where
    T: Entity,
    R: RepositoryAdd<T>
        + RepositoryGet<T>
        + RepositoryUpdate<T>
        + RepositoryAddOrUpdate<T>
        + RepositoryRemove<T>
        + RepositoryFind<T>,
{
}
