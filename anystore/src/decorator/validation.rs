use super::forward_capability;
use crate::decorator::Decorator;
use crate::entity::Entity;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::repository::{
    AddOrUpdateResult, RepositoryAdd, RepositoryAddOrUpdate, RepositoryUpdate,
};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Accepts or rejects an entity before it is written.
///
/// A rejection should use [`ErrorKind::ValidationError`].
#[async_trait]
pub trait Validator<T>: Send + Sync {
    async fn validate(&self, entity: &T, cancel: &CancellationToken) -> StoreResult<()>;
}

#[async_trait]
impl<T: Entity, V: Validator<T> + ?Sized> Validator<T> for Arc<V> {
    async fn validate(&self, entity: &T, cancel: &CancellationToken) -> StoreResult<()> {
        self.as_ref().validate(entity, cancel).await
    }
}

/// Builds a [`Validator`] from a closure returning a rejection message.
///
/// # Examples
///
/// ```rust,ignore
/// let titled = validator_fn(|note: &Note| {
///     if note.title.is_empty() { Err("title is required".to_string()) } else { Ok(()) }
/// });
/// ```
pub fn validator_fn<T, F>(f: F) -> FnValidator<T, F>
where
    F: Fn(&T) -> Result<(), String> + Send + Sync,
{
    FnValidator {
        f,
        _phantom: PhantomData,
    }
}

pub struct FnValidator<T, F> {
    f: F,
    _phantom: PhantomData<fn(&T)>,
}

#[async_trait]
impl<T, F> Validator<T> for FnValidator<T, F>
where
    T: Entity,
    F: Fn(&T) -> Result<(), String> + Send + Sync,
{
    async fn validate(&self, entity: &T, _cancel: &CancellationToken) -> StoreResult<()> {
        (self.f)(entity).map_err(|reason| rejected::<T>(&reason))
    }
}

/// Runs the rules declared with `#[derive(validator::Validate)]`.
#[cfg(feature = "validator")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateDerive;

#[cfg(feature = "validator")]
#[async_trait]
impl<T> Validator<T> for ValidateDerive
where
    T: Entity + validator::Validate,
{
    async fn validate(&self, entity: &T, _cancel: &CancellationToken) -> StoreResult<()> {
        validator::Validate::validate(entity).map_err(|errors| rejected::<T>(&errors.to_string()))
    }
}

fn rejected<T: Entity>(reason: &str) -> StoreError {
    log::error!("Validation of '{}' failed: {}", T::entity_name(), reason);
    StoreError::new(
        &format!("Validation of '{}' failed: {}", T::entity_name(), reason),
        ErrorKind::ValidationError,
    )
}

/// Decorator factory for [`ValidationDecorator`].
pub struct Validation<V> {
    validator: V,
}

impl<V> Validation<V> {
    pub fn new(validator: V) -> Self {
        Validation { validator }
    }
}

impl<R, V> Decorator<R> for Validation<V> {
    type Output = ValidationDecorator<R, V>;

    fn name(&self) -> &'static str {
        "validation"
    }

    fn decorate(self, inner: R) -> Self::Output {
        ValidationDecorator::new(inner, self.validator)
    }
}

/// Validates entities before add, update and add-or-update.
///
/// A rejected entity never reaches the inner repository. Reads, removals
/// and queries pass straight through.
pub struct ValidationDecorator<R, V> {
    inner: R,
    validator: V,
}

impl<R, V> ValidationDecorator<R, V> {
    pub fn new(inner: R, validator: V) -> Self {
        ValidationDecorator { inner, validator }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<T, R, V> RepositoryAdd<T> for ValidationDecorator<R, V>
where
    T: Entity,
    R: RepositoryAdd<T>,
    V: Validator<T>,
{
    async fn add(&self, entity: T, cancel: &CancellationToken) -> StoreResult<T> {
        self.validator.validate(&entity, cancel).await?;
        self.inner.add(entity, cancel).await
    }
}

#[async_trait]
impl<T, R, V> RepositoryUpdate<T> for ValidationDecorator<R, V>
where
    T: Entity,
    R: RepositoryUpdate<T>,
    V: Validator<T>,
{
    async fn update(&self, entity: T, cancel: &CancellationToken) -> StoreResult<T> {
        self.validator.validate(&entity, cancel).await?;
        self.inner.update(entity, cancel).await
    }

    fn max_update_retries(&self) -> usize {
        self.inner.max_update_retries()
    }
}

#[async_trait]
impl<T, R, V> RepositoryAddOrUpdate<T> for ValidationDecorator<R, V>
where
    T: Entity,
    R: RepositoryAddOrUpdate<T>,
    V: Validator<T>,
{
    async fn add_or_update(
        &self,
        entity: T,
        cancel: &CancellationToken,
    ) -> StoreResult<AddOrUpdateResult<T>> {
        self.validator.validate(&entity, cancel).await?;
        self.inner.add_or_update(entity, cancel).await
    }
}

forward_capability!(get for ValidationDecorator<V>);
forward_capability!(remove for ValidationDecorator<V>);
forward_capability!(find for ValidationDecorator<V>);
