use crate::common::REPOSITORY_EVENT;
use crate::decorator::{EventDispatcher, RepositoryEvent};
use crate::entity::Entity;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use anyhow::Error;
use async_trait::async_trait;
use basu::error::BasuError;
use basu::event::Event;
use basu::{EventBus, Handle, HandlerId};
use std::fmt::Debug;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Closure signature accepted by [`RepositoryEventListener`].
pub trait RepositoryEventCallback<T>: Send + Sync + Fn(RepositoryEvent<T>) -> StoreResult<()> {}

impl<T, F> RepositoryEventCallback<T> for F where F: Send + Sync + Fn(RepositoryEvent<T>) -> StoreResult<()> {}

/// A subscriber on an [`EventBusDispatcher`].
///
/// ```rust,ignore
/// bus.register(RepositoryEventListener::new(|event: RepositoryEvent<Order>| {
///     log::info!("{} {}", event.kind(), event.id());
///     Ok(())
/// }))?;
/// ```
pub struct RepositoryEventListener<T> {
    on_event: Arc<dyn RepositoryEventCallback<T>>,
}

impl<T> Clone for RepositoryEventListener<T> {
    fn clone(&self) -> Self {
        RepositoryEventListener {
            on_event: self.on_event.clone(),
        }
    }
}

impl<T: Entity> RepositoryEventListener<T> {
    pub fn new(on_event: impl RepositoryEventCallback<T> + 'static) -> Self {
        RepositoryEventListener {
            on_event: Arc::new(on_event),
        }
    }
}

impl<T: Entity> Handle<RepositoryEvent<T>> for RepositoryEventListener<T> {
    fn handle(&self, event: &Event<RepositoryEvent<T>>) -> Result<(), BasuError> {
        match (self.on_event)(event.data.clone()) {
            Ok(_) => Ok(()),
            Err(e) => Err(BasuError::HandlerError(Error::from(e))),
        }
    }
}

impl<T> Debug for RepositoryEventListener<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryEventListener").finish()
    }
}

/// Handle returned by [`EventBusDispatcher::register`].
pub struct SubscriberRef {
    inner: HandlerId,
}

/// Publishes repository events on a `basu` event bus.
///
/// Listeners run synchronously inside `dispatch`; the first listener error
/// is returned as `EventError`. Publishing with no listeners is a no-op.
pub struct EventBusDispatcher<T> {
    inner: Arc<EventBusDispatcherInner<T>>,
}

impl<T> Clone for EventBusDispatcher<T> {
    fn clone(&self) -> Self {
        EventBusDispatcher {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Entity> Default for EventBusDispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EventBusDispatcher<T> {
    pub fn new() -> Self {
        EventBusDispatcher {
            inner: Arc::new(EventBusDispatcherInner {
                event_bus: EventBus::new(),
            }),
        }
    }

    pub fn register(&self, listener: RepositoryEventListener<T>) -> StoreResult<SubscriberRef> {
        self.inner.register(listener)
    }

    pub fn deregister(&self, subscriber: SubscriberRef) -> StoreResult<()> {
        self.inner.deregister(subscriber)
    }

    pub fn publish(&self, event: RepositoryEvent<T>) -> StoreResult<()> {
        self.inner.publish(event)
    }

    /// Drops every listener.
    pub fn close(&self) -> StoreResult<()> {
        self.inner.close()
    }

    pub fn has_listeners(&self) -> bool {
        self.inner.has_listeners()
    }
}

#[async_trait]
impl<T: Entity> EventDispatcher<T> for EventBusDispatcher<T> {
    async fn dispatch(&self, event: RepositoryEvent<T>, _cancel: &CancellationToken) -> StoreResult<()> {
        self.publish(event)
    }
}

struct EventBusDispatcherInner<T> {
    event_bus: EventBus<RepositoryEvent<T>>,
}

impl<T: Entity> EventBusDispatcherInner<T> {
    fn register(&self, listener: RepositoryEventListener<T>) -> StoreResult<SubscriberRef> {
        match self.event_bus.subscribe(REPOSITORY_EVENT, Box::new(listener)) {
            Ok(inner) => Ok(SubscriberRef { inner }),
            Err(e) => Err(Self::store_error(e)),
        }
    }

    fn deregister(&self, subscriber: SubscriberRef) -> StoreResult<()> {
        match self.event_bus.unsubscribe(REPOSITORY_EVENT, &subscriber.inner) {
            Ok(_) => Ok(()),
            Err(e) => Err(Self::store_error(e)),
        }
    }

    fn publish(&self, event: RepositoryEvent<T>) -> StoreResult<()> {
        if !self.has_listeners() {
            return Ok(());
        }

        let basu_event = Event::new(event);
        match self.event_bus.publish(REPOSITORY_EVENT, &basu_event) {
            Ok(_) => Ok(()),
            Err(e) => Err(Self::store_error(e)),
        }
    }

    fn close(&self) -> StoreResult<()> {
        match self.event_bus.clear() {
            Ok(_) => Ok(()),
            Err(e) => Err(Self::store_error(e)),
        }
    }

    fn has_listeners(&self) -> bool {
        match self.event_bus.get_handler_count(REPOSITORY_EVENT) {
            Ok(count) => count > 0,
            Err(BasuError::EventTypeNotFOUND) => false,
            Err(e) => {
                log::warn!("Failed to count event listeners: {}", e);
                false
            }
        }
    }

    fn store_error(e: BasuError) -> StoreError {
        let message = match e {
            BasuError::EventTypeNotFOUND => {
                "Event bus error: no listener was ever registered for repository events".to_string()
            }
            BasuError::MutexPoisoned => {
                "Event bus error: internal mutex poisoned".to_string()
            }
            BasuError::HandlerError(e) => format!("Event listener failed: {}", e),
        };
        log::error!("{}", message);
        StoreError::new(&message, ErrorKind::EventError)
    }
}
