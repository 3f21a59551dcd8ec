use crate::entity::Entity;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::repository::{RepositoryGet, RepositoryUpdate};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Helpers built on the lookup and update primitives.
///
/// Implemented for every type that can get and update, decorated or not.
#[async_trait]
pub trait RepositoryExt<T: Entity>: RepositoryGet<T> + RepositoryUpdate<T> {
    /// Like [`try_get_by_id`](RepositoryGet::try_get_by_id) but a miss fails
    /// with `NotFound`.
    async fn get_by_id(&self, id: &str, cancel: &CancellationToken) -> StoreResult<T> {
        match self.try_get_by_id(id, cancel).await? {
            Some(entity) => Ok(entity),
            None => {
                log::error!("Entity '{}' with id '{}' not found", T::entity_name(), id);
                Err(StoreError::new(
                    &format!("Entity '{}' with id '{}' not found", T::entity_name(), id),
                    ErrorKind::NotFound,
                ))
            }
        }
    }

    /// Reads the latest version of `id`, applies `mutate` and updates,
    /// retrying on `Concurrency` up to the repository's
    /// [`max_update_retries`](RepositoryUpdate::max_update_retries).
    async fn update_latest<F>(&self, id: &str, mutate: F, cancel: &CancellationToken) -> StoreResult<T>
    where
        F: FnMut(&mut T) + Send,
    {
        self.update_latest_with_retries(id, self.max_update_retries(), mutate, cancel)
            .await
    }

    /// Read-latest-then-update with an explicit retry budget.
    ///
    /// The read primitive runs at most `retries + 1` times. Only
    /// `Concurrency` is retried; once the budget is spent the last
    /// `Concurrency` failure is returned. Every other failure returns
    /// immediately.
    async fn update_latest_with_retries<F>(
        &self,
        id: &str,
        retries: usize,
        mut mutate: F,
        cancel: &CancellationToken,
    ) -> StoreResult<T>
    where
        F: FnMut(&mut T) + Send,
    {
        let mut attempt = 0;
        loop {
            let mut entity = self.get_by_id(id, cancel).await?;
            mutate(&mut entity);
            match self.update(entity, cancel).await {
                Ok(updated) => return Ok(updated),
                Err(err) if *err.kind() == ErrorKind::Concurrency && attempt < retries => {
                    attempt += 1;
                    log::warn!(
                        "Concurrent update of '{}' with id '{}', retry {} of {}",
                        T::entity_name(),
                        id,
                        attempt,
                        retries
                    );
                }
                Err(err) => {
                    if *err.kind() == ErrorKind::Concurrency {
                        log::error!(
                            "Giving up updating '{}' with id '{}' after {} retries",
                            T::entity_name(),
                            id,
                            retries
                        );
                    }
                    return Err(err);
                }
            }
        }
    }
}

impl<T, R> RepositoryExt<T> for R
where
    T: Entity,
    R: RepositoryGet<T> + RepositoryUpdate<T> + ?Sized,
{
}
