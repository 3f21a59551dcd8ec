/// Wraps a repository of type `R` into a decorated repository.
///
/// Implemented by the decorator factories ([`Validation`](crate::decorator::Validation),
/// [`Events`](crate::decorator::Events), [`Logging`](crate::decorator::Logging));
/// custom decorators implement it the same way.
pub trait Decorator<R> {
    type Output;

    /// Short name reported by [`RepositoryBuilder::layers`].
    fn name(&self) -> &'static str;

    fn decorate(self, inner: R) -> Self::Output;
}

/// Composes decorators around a base repository.
///
/// Decorators are applied in the order they are registered, so the last
/// registered decorator is the outermost wrapper and intercepts calls first.
///
/// # Examples
///
/// ```rust
/// use anystore::decorator::{Logging, RepositoryBuilder};
/// use anystore::memory::MemoryRepository;
/// # use anystore::entity::Entity;
/// # #[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
/// # struct Order { id: String }
/// # impl Entity for Order {
/// #     fn entity_name() -> &'static str { "orders" }
/// #     fn id(&self) -> &str { &self.id }
/// #     fn set_id(&mut self, id: String) { self.id = id; }
/// # }
///
/// let builder = RepositoryBuilder::new(MemoryRepository::<Order>::new().unwrap())
///     .with(Logging::new("orders"));
/// assert_eq!(builder.layers(), &["logging"]);
/// let _repository = builder.build();
/// ```
pub struct RepositoryBuilder<R> {
    repository: R,
    layers: Vec<&'static str>,
}

impl<R> RepositoryBuilder<R> {
    pub fn new(repository: R) -> Self {
        RepositoryBuilder {
            repository,
            layers: Vec::new(),
        }
    }

    /// Wraps the current repository with `decorator`.
    pub fn with<D: Decorator<R>>(self, decorator: D) -> RepositoryBuilder<D::Output> {
        let mut layers = self.layers;
        layers.insert(0, decorator.name());
        log::debug!("Applying repository decorator '{}'", decorator.name());
        RepositoryBuilder {
            repository: decorator.decorate(self.repository),
            layers,
        }
    }

    /// Decorator names, outermost first.
    pub fn layers(&self) -> &[&'static str] {
        &self.layers
    }

    pub fn build(self) -> R {
        self.repository
    }
}
