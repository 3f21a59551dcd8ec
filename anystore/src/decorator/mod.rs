//! Repository decorators.
//!
//! A decorator wraps an inner repository and implements the same capability
//! traits, adding one cross-cutting behavior around the call through. Each
//! decorator implements a capability only when its inner repository does, so
//! a decorated repository exposes exactly the inner's capability set.
//!
//! Decorators are applied with [`RepositoryBuilder`] in registration order:
//! the first one registered wraps the base repository, the last one
//! registered is the outermost layer and sees every call first.
//!
//! ```rust,ignore
//! let repository = RepositoryBuilder::new(MemoryRepository::<Order>::new()?)
//!     .with(Events::new(dispatcher))
//!     .with(Validation::new(ValidateDerive))
//!     .build();
//! // validation runs first; events only fire for entities that passed it
//! ```

mod builder;
mod event_bus;
mod events;
mod logging;
mod validation;

pub use builder::*;
pub use event_bus::*;
pub use events::*;
pub use logging::*;
pub use validation::*;

/// Implements a capability by calling straight through to `self.inner`.
macro_rules! forward_capability {
    (get for $decorator:ident<$($param:ident),*>) => {
        #[async_trait::async_trait]
        impl<T, R, $($param),*> $crate::repository::RepositoryGet<T> for $decorator<R, $($param),*>
        where
            T: $crate::entity::Entity,
            R: $crate::repository::RepositoryGet<T>,
            $($param: Send + Sync),*
        {
            async fn try_get_by_id(
                &self,
                id: &str,
                cancel: &tokio_util::sync::CancellationToken,
            ) -> $crate::errors::StoreResult<Option<T>> {
                self.inner.try_get_by_id(id, cancel).await
            }
        }
    };
    (remove for $decorator:ident<$($param:ident),*>) => {
        #[async_trait::async_trait]
        impl<T, R, $($param),*> $crate::repository::RepositoryRemove<T> for $decorator<R, $($param),*>
        where
            T: $crate::entity::Entity,
            R: $crate::repository::RepositoryRemove<T>,
            $($param: Send + Sync),*
        {
            async fn try_remove(
                &self,
                id: &str,
                cancel: &tokio_util::sync::CancellationToken,
            ) -> $crate::errors::StoreResult<bool> {
                self.inner.try_remove(id, cancel).await
            }
        }
    };
    (find for $decorator:ident<$($param:ident),*>) => {
        #[async_trait::async_trait]
        impl<T, R, $($param),*> $crate::repository::RepositoryFind<T> for $decorator<R, $($param),*>
        where
            T: $crate::entity::Entity,
            R: $crate::repository::RepositoryFind<T>,
            $($param: Send + Sync),*
        {
            async fn find<Q, Out>(
                &self,
                query: &Q,
                cancel: &tokio_util::sync::CancellationToken,
            ) -> $crate::errors::StoreResult<$crate::continuation::ContinuationEnumerable<Out>>
            where
                Q: $crate::query::Query,
                Out: Send + 'static,
            {
                self.inner.find::<Q, Out>(query, cancel).await
            }
        }
    };
}

pub(crate) use forward_capability;
