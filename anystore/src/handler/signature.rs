use std::any::{type_name, TypeId};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// A runtime type identity paired with its readable name.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// The structural key a handler is registered and resolved under.
///
/// Two signatures are equal when entity, result and query types are all the
/// same concrete types; names only serve diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerSignature {
    entity: TypeKey,
    result: TypeKey,
    query: TypeKey,
}

impl HandlerSignature {
    pub fn of<E: 'static, Q: 'static, R: 'static>() -> Self {
        HandlerSignature {
            entity: TypeKey::of::<E>(),
            result: TypeKey::of::<R>(),
            query: TypeKey::of::<Q>(),
        }
    }

    pub fn entity(&self) -> &TypeKey {
        &self.entity
    }

    pub fn result(&self) -> &TypeKey {
        &self.result
    }

    pub fn query(&self) -> &TypeKey {
        &self.query
    }
}

impl Display for HandlerSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} on {}",
            self.query.name, self.result.name, self.entity.name
        )
    }
}
