use super::forward_capability;
use crate::common::get_current_time_or_zero;
use crate::decorator::Decorator;
use crate::entity::Entity;
use crate::errors::StoreResult;
use crate::repository::{
    AddOrUpdateResult, RepositoryAdd, RepositoryAddOrUpdate, RepositoryRemove, RepositoryUpdate,
};
use async_trait::async_trait;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The mutation a [`RepositoryEvent`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryEventKind {
    Added,
    Updated,
    Removed,
}

impl Display for RepositoryEventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryEventKind::Added => write!(f, "added"),
            RepositoryEventKind::Updated => write!(f, "updated"),
            RepositoryEventKind::Removed => write!(f, "removed"),
        }
    }
}

/// A domain event emitted after a successful mutation.
///
/// Added and updated events carry the entity as the inner repository
/// returned it (with id, ETag and timestamp); removal only knows the id.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryEvent<T> {
    kind: RepositoryEventKind,
    id: String,
    entity: Option<T>,
    timestamp: u128,
}

impl<T: Entity> RepositoryEvent<T> {
    pub fn added(entity: T) -> Self {
        Self::with_entity(RepositoryEventKind::Added, entity)
    }

    pub fn updated(entity: T) -> Self {
        Self::with_entity(RepositoryEventKind::Updated, entity)
    }

    pub fn removed(id: &str) -> Self {
        RepositoryEvent {
            kind: RepositoryEventKind::Removed,
            id: id.to_string(),
            entity: None,
            timestamp: get_current_time_or_zero(),
        }
    }

    fn with_entity(kind: RepositoryEventKind, entity: T) -> Self {
        RepositoryEvent {
            kind,
            id: entity.id().to_string(),
            entity: Some(entity),
            timestamp: get_current_time_or_zero(),
        }
    }

    pub fn kind(&self) -> RepositoryEventKind {
        self.kind
    }

    pub fn entity_name(&self) -> &'static str {
        T::entity_name()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn entity(&self) -> Option<&T> {
        self.entity.as_ref()
    }

    /// Milliseconds since the Unix epoch when the event was created.
    pub fn timestamp(&self) -> u128 {
        self.timestamp
    }
}

/// Delivers repository events; the call is awaited before the mutation returns.
#[async_trait]
pub trait EventDispatcher<T>: Send + Sync {
    async fn dispatch(&self, event: RepositoryEvent<T>, cancel: &CancellationToken) -> StoreResult<()>;
}

#[async_trait]
impl<T: Entity, D: EventDispatcher<T> + ?Sized> EventDispatcher<T> for Arc<D> {
    async fn dispatch(&self, event: RepositoryEvent<T>, cancel: &CancellationToken) -> StoreResult<()> {
        self.as_ref().dispatch(event, cancel).await
    }
}

/// Builds an [`EventDispatcher`] from a closure.
pub fn dispatcher_fn<T, F>(f: F) -> FnDispatcher<T, F>
where
    F: Fn(RepositoryEvent<T>) -> StoreResult<()> + Send + Sync,
{
    FnDispatcher {
        f,
        _phantom: PhantomData,
    }
}

pub struct FnDispatcher<T, F> {
    f: F,
    _phantom: PhantomData<fn(RepositoryEvent<T>)>,
}

#[async_trait]
impl<T, F> EventDispatcher<T> for FnDispatcher<T, F>
where
    T: Entity,
    F: Fn(RepositoryEvent<T>) -> StoreResult<()> + Send + Sync,
{
    async fn dispatch(&self, event: RepositoryEvent<T>, _cancel: &CancellationToken) -> StoreResult<()> {
        (self.f)(event)
    }
}

/// Decorator factory for [`EventsDecorator`].
pub struct Events<D> {
    dispatcher: D,
}

impl<D> Events<D> {
    pub fn new(dispatcher: D) -> Self {
        Events { dispatcher }
    }
}

impl<R, D> Decorator<R> for Events<D> {
    type Output = EventsDecorator<R, D>;

    fn name(&self) -> &'static str {
        "events"
    }

    fn decorate(self, inner: R) -> Self::Output {
        EventsDecorator::new(inner, self.dispatcher)
    }
}

/// Emits a [`RepositoryEvent`] after each successful mutation.
///
/// Nothing is emitted when the inner call fails. `try_remove` emits only
/// when something was removed, and `add_or_update` emits `Added` or
/// `Updated` according to the branch the inner repository took. A failed
/// dispatch is returned to the caller after the mutation has been applied.
pub struct EventsDecorator<R, D> {
    inner: R,
    dispatcher: D,
}

impl<R, D> EventsDecorator<R, D> {
    pub fn new(inner: R, dispatcher: D) -> Self {
        EventsDecorator { inner, dispatcher }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<T, R, D> RepositoryAdd<T> for EventsDecorator<R, D>
where
    T: Entity,
    R: RepositoryAdd<T>,
    D: EventDispatcher<T>,
{
    async fn add(&self, entity: T, cancel: &CancellationToken) -> StoreResult<T> {
        let added = self.inner.add(entity, cancel).await?;
        self.dispatcher
            .dispatch(RepositoryEvent::added(added.clone()), cancel)
            .await?;
        Ok(added)
    }
}

#[async_trait]
impl<T, R, D> RepositoryUpdate<T> for EventsDecorator<R, D>
where
    T: Entity,
    R: RepositoryUpdate<T>,
    D: EventDispatcher<T>,
{
    async fn update(&self, entity: T, cancel: &CancellationToken) -> StoreResult<T> {
        let updated = self.inner.update(entity, cancel).await?;
        self.dispatcher
            .dispatch(RepositoryEvent::updated(updated.clone()), cancel)
            .await?;
        Ok(updated)
    }

    fn max_update_retries(&self) -> usize {
        self.inner.max_update_retries()
    }
}

#[async_trait]
impl<T, R, D> RepositoryAddOrUpdate<T> for EventsDecorator<R, D>
where
    T: Entity,
    R: RepositoryAddOrUpdate<T>,
    D: EventDispatcher<T>,
{
    async fn add_or_update(
        &self,
        entity: T,
        cancel: &CancellationToken,
    ) -> StoreResult<AddOrUpdateResult<T>> {
        let result = self.inner.add_or_update(entity, cancel).await?;
        let event = if result.was_added {
            RepositoryEvent::added(result.entity.clone())
        } else {
            RepositoryEvent::updated(result.entity.clone())
        };
        self.dispatcher.dispatch(event, cancel).await?;
        Ok(result)
    }
}

#[async_trait]
impl<T, R, D> RepositoryRemove<T> for EventsDecorator<R, D>
where
    T: Entity,
    R: RepositoryRemove<T>,
    D: EventDispatcher<T>,
{
    async fn try_remove(&self, id: &str, cancel: &CancellationToken) -> StoreResult<bool> {
        let removed = self.inner.try_remove(id, cancel).await?;
        if removed {
            self.dispatcher
                .dispatch(RepositoryEvent::<T>::removed(id), cancel)
                .await?;
        }
        Ok(removed)
    }
}

forward_capability!(get for EventsDecorator<D>);
forward_capability!(find for EventsDecorator<D>);
