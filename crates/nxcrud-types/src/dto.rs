use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::exposable::Exposable;

// ---------------------------------------------------------------------------
// OpaqueObject
// ---------------------------------------------------------------------------

/// A domain object with no serializable form of its own.
#[derive(Clone)]
pub struct OpaqueObject {
    inner: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl OpaqueObject {
    pub fn new<T: Any + Send + Sync>(object: T) -> Self {
        Self {
            inner: Arc::new(object),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if both handles point at the same object.
    pub fn same_object(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for OpaqueObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpaqueObject({})", self.type_name)
    }
}

// ---------------------------------------------------------------------------
// DtoFactory
// ---------------------------------------------------------------------------

/// Maps domain objects onto the DTOs that expose them.
pub trait DtoFactory: Send + Sync {
    /// The DTO for `object`, or `None` if its type has no DTO.
    fn dto_for(&self, object: &OpaqueObject) -> Option<Arc<dyn Exposable>>;

    /// Returns `true` if `object` has a DTO.
    fn has_dto(&self, object: &OpaqueObject) -> bool {
        self.dto_for(object).is_some()
    }
}

type Constructor = Box<dyn Fn(&OpaqueObject) -> Option<Arc<dyn Exposable>> + Send + Sync>;

/// [`DtoFactory`] with one registered constructor per domain type.
#[derive(Default)]
pub struct MappedDtoFactory {
    constructors: HashMap<TypeId, Constructor>,
}

impl MappedDtoFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the DTO constructor for domain type `T`.
    pub fn register<T, D, F>(&mut self, constructor: F)
    where
        T: Any,
        D: Exposable + 'static,
        F: Fn(&T) -> D + Send + Sync + 'static,
    {
        self.constructors.insert(
            TypeId::of::<T>(),
            Box::new(move |object: &OpaqueObject| {
                object
                    .downcast_ref::<T>()
                    .map(|domain| Arc::new(constructor(domain)) as Arc<dyn Exposable>)
            }),
        );
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl DtoFactory for MappedDtoFactory {
    fn dto_for(&self, object: &OpaqueObject) -> Option<Arc<dyn Exposable>> {
        self.constructors
            .get(&object.type_id())
            .and_then(|constructor| constructor(object))
    }

    fn has_dto(&self, object: &OpaqueObject) -> bool {
        self.constructors.contains_key(&object.type_id())
    }
}

impl fmt::Debug for MappedDtoFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedDtoFactory")
            .field("registered", &self.constructors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposable::Dto;
    use crate::value::Value;

    struct Article {
        id: u64,
        headline: String,
    }

    struct Comment;

    fn factory() -> MappedDtoFactory {
        let mut factory = MappedDtoFactory::new();
        factory.register(|a: &Article| {
            Dto::new(a.headline.clone())
                .with_identity(a.id.to_string())
                .expose("headline", |h: &String| Value::from(h.as_str()))
        });
        factory
    }

    #[test]
    fn registered_type_gets_dto() {
        let object = OpaqueObject::new(Article {
            id: 7,
            headline: "Hello".into(),
        });
        let factory = factory();
        assert!(factory.has_dto(&object));
        let dto = factory.dto_for(&object).unwrap();
        assert_eq!(dto.identity().as_deref(), Some("7"));
        assert_eq!(dto.property("headline"), Some(Value::from("Hello")));
    }

    #[test]
    fn unknown_type_has_no_dto() {
        let object = OpaqueObject::new(Comment);
        assert!(!factory().has_dto(&object));
        assert!(factory().dto_for(&object).is_none());
    }

    #[test]
    fn clones_share_identity() {
        let a = OpaqueObject::new(Comment);
        let b = a.clone();
        assert!(a.same_object(&b));
        assert!(!a.same_object(&OpaqueObject::new(Comment)));
        assert!(a.type_name().ends_with("Comment"));
    }
}
