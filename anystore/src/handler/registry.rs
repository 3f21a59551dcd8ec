use crate::entity::Entity;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::handler::{HandlerSignature, QueryHandler};
use crate::query::Query;
use itertools::Itertools;
use std::any::Any;
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

type ErasedHandler = Arc<dyn Any + Send + Sync>;

/// A bundle of handlers a backend contributes to a registry.
///
/// Modules are loaded into a [`HandlerRegistryBuilder`] while the repository
/// is being assembled; loading twice, or loading two modules that cover the
/// same signature, fails with `InvalidOperation`.
pub trait HandlerModule: Send + Sync {
    fn name(&self) -> &str;

    fn load(&self, registrar: &mut HandlerRegistryBuilder) -> StoreResult<()>;
}

/// Collects handlers before the registry is frozen.
pub struct HandlerRegistryBuilder {
    backend: String,
    handlers: HashMap<HandlerSignature, ErasedHandler>,
}

impl HandlerRegistryBuilder {
    /// Starts an empty registry for the backend named `backend`.
    pub fn new(backend: &str) -> Self {
        HandlerRegistryBuilder {
            backend: backend.to_string(),
            handlers: HashMap::new(),
        }
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Registers `handler` for `(E, Q, R)`.
    ///
    /// A signature can be registered once; a second registration is
    /// rejected so that resolution never has to choose between handlers.
    pub fn register<E, Q, R, H>(&mut self, handler: H) -> StoreResult<()>
    where
        E: Entity,
        Q: Query,
        R: Send + 'static,
        H: QueryHandler<E, Q, R> + 'static,
    {
        let signature = HandlerSignature::of::<E, Q, R>();
        if self.handlers.contains_key(&signature) {
            log::error!(
                "A query handler for {} is already registered in backend '{}'",
                signature,
                self.backend
            );
            return Err(StoreError::new(
                &format!(
                    "A query handler for {} is already registered in backend '{}'",
                    signature, self.backend
                ),
                ErrorKind::InvalidOperation,
            ));
        }

        let handler: Arc<dyn QueryHandler<E, Q, R>> = Arc::new(handler);
        self.handlers.insert(signature, Arc::new(handler));
        log::debug!("Registered query handler {} in backend '{}'", signature, self.backend);
        Ok(())
    }

    /// Lets `module` register its handlers.
    pub fn load_module(&mut self, module: &dyn HandlerModule) -> StoreResult<()> {
        log::debug!("Loading handler module '{}' into backend '{}'", module.name(), self.backend);
        module.load(self)
    }

    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            inner: Arc::new(HandlerRegistryInner {
                backend: self.backend,
                handlers: self.handlers,
            }),
        }
    }
}

/// Immutable map from [`HandlerSignature`] to handler.
///
/// Cloning is cheap and every clone sees the same handlers, so one registry
/// can serve any number of concurrent callers.
#[derive(Clone)]
pub struct HandlerRegistry {
    inner: Arc<HandlerRegistryInner>,
}

impl HandlerRegistry {
    pub fn builder(backend: &str) -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::new(backend)
    }
}

impl Deref for HandlerRegistry {
    type Target = HandlerRegistryInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

pub struct HandlerRegistryInner {
    backend: String,
    handlers: HashMap<HandlerSignature, ErasedHandler>,
}

impl HandlerRegistryInner {
    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered signatures, sorted by their display form.
    pub fn signatures(&self) -> Vec<HandlerSignature> {
        self.handlers
            .keys()
            .copied()
            .sorted_by_key(|s| s.to_string())
            .collect()
    }

    pub fn contains<E: 'static, Q: 'static, R: 'static>(&self) -> bool {
        self.handlers
            .contains_key(&HandlerSignature::of::<E, Q, R>())
    }

    /// Looks up the handler registered for `(E, Q, R)`.
    pub fn resolve<E, Q, R>(&self) -> StoreResult<Arc<dyn QueryHandler<E, Q, R>>>
    where
        E: Entity,
        Q: Query,
        R: Send + 'static,
    {
        let signature = HandlerSignature::of::<E, Q, R>();
        let erased = match self.handlers.get(&signature) {
            Some(erased) => erased,
            None => {
                log::error!(
                    "No query handler for query '{}' returning '{}' on entity '{}' in backend '{}'",
                    signature.query().name(),
                    signature.result().name(),
                    E::entity_name(),
                    self.backend
                );
                return Err(StoreError::new(
                    &format!(
                        "No query handler for query '{}' returning '{}' on entity '{}' in backend '{}'",
                        signature.query().name(),
                        signature.result().name(),
                        E::entity_name(),
                        self.backend
                    ),
                    ErrorKind::UnsupportedFeature,
                ));
            }
        };

        match erased.downcast_ref::<Arc<dyn QueryHandler<E, Q, R>>>() {
            Some(handler) => Ok(handler.clone()),
            None => {
                log::error!("Query handler registered for {} has an unexpected type", signature);
                Err(StoreError::new(
                    &format!("Query handler registered for {} has an unexpected type", signature),
                    ErrorKind::InternalError,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::continuation::ContinuationEnumerable;
    use crate::entity::tests::Note;
    use crate::handler::handler_fn;
    use crate::query::{AllQuery, CriteriaQuery};

    fn all_notes() -> impl QueryHandler<Note, AllQuery, Note> {
        handler_fn(|_q: &AllQuery, _c| Ok(ContinuationEnumerable::new(vec![Note::new("a", 1)], None)))
    }

    #[test]
    fn test_register_and_resolve() {
        let mut builder = HandlerRegistry::builder("memory");
        builder.register::<Note, AllQuery, Note, _>(all_notes()).unwrap();
        let registry = builder.build();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains::<Note, AllQuery, Note>());
        assert!(!registry.contains::<Note, CriteriaQuery, Note>());
        assert!(registry.resolve::<Note, AllQuery, Note>().is_ok());
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut builder = HandlerRegistryBuilder::new("memory");
        builder.register::<Note, AllQuery, Note, _>(all_notes()).unwrap();
        let err = builder
            .register::<Note, AllQuery, Note, _>(all_notes())
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
        assert!(err.message().contains("already registered"));
    }

    #[test]
    fn test_same_query_different_result_is_distinct() {
        let mut builder = HandlerRegistryBuilder::new("memory");
        builder.register::<Note, AllQuery, Note, _>(all_notes()).unwrap();
        builder
            .register::<Note, AllQuery, String, _>(handler_fn(|_q: &AllQuery, _c| {
                Ok(ContinuationEnumerable::new(vec!["a".to_string()], None))
            }))
            .unwrap();
        assert_eq!(builder.build().signatures().len(), 2);
    }

    #[test]
    fn test_missing_handler_is_unsupported() {
        let registry = HandlerRegistryBuilder::new("memory").build();
        let err = match registry.resolve::<Note, CriteriaQuery, Note>() {
            Ok(_) => panic!("resolution should fail"),
            Err(err) => err,
        };
        assert_eq!(err.kind(), &ErrorKind::UnsupportedFeature);
        assert!(err.message().contains("CriteriaQuery"));
        assert!(err.message().contains("notes"));
        assert!(err.message().contains("memory"));
    }

    #[test]
    fn test_wrong_stored_type_is_internal_error() {
        let mut builder = HandlerRegistryBuilder::new("memory");
        builder
            .handlers
            .insert(HandlerSignature::of::<Note, AllQuery, Note>(), Arc::new(42u8));
        let registry = builder.build();
        let err = match registry.resolve::<Note, AllQuery, Note>() {
            Ok(_) => panic!("resolution should fail"),
            Err(err) => err,
        };
        assert_eq!(err.kind(), &ErrorKind::InternalError);
    }

    struct TwoHandlers;

    impl HandlerModule for TwoHandlers {
        fn name(&self) -> &str {
            "two"
        }

        fn load(&self, registrar: &mut HandlerRegistryBuilder) -> StoreResult<()> {
            registrar.register::<Note, AllQuery, Note, _>(all_notes())?;
            registrar.register::<Note, CriteriaQuery, Note, _>(handler_fn(
                |_q: &CriteriaQuery, _c| Ok(ContinuationEnumerable::empty()),
            ))
        }
    }

    #[test]
    fn test_load_module() {
        let mut builder = HandlerRegistryBuilder::new("memory");
        builder.load_module(&TwoHandlers).unwrap();
        assert_eq!(builder.build().len(), 2);

        let mut builder = HandlerRegistryBuilder::new("memory");
        builder.load_module(&TwoHandlers).unwrap();
        let err = builder.load_module(&TwoHandlers).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
    }
}
