use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde_json::{Number, Value as JsonValue};

use crate::dto::OpaqueObject;
use crate::exposable::Exposable;
use crate::pointer::Pointer;
use crate::resource::ResourceRef;
use crate::PATH_SEPARATOR;

// ---------------------------------------------------------------------------
// Scalar
// ---------------------------------------------------------------------------

/// A leaf value that serializes as itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    /// The JSON representation of this scalar.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Number(n) => JsonValue::Number(n.clone()),
            Self::String(s) => JsonValue::String(s.clone()),
        }
    }

    /// Text form used when the scalar appears inside a URI.
    ///
    /// Returns `None` for `Null`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(true) => Some("1".into()),
            Self::Bool(false) => Some("0".into()),
            Self::Number(n) => Some(n.to_string()),
            Self::String(s) => Some(s.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A value the serialization engine knows how to walk.
///
/// Containers are ordered: `Sequence` by position, `Keyed` by insertion.
#[derive(Clone)]
pub enum Value {
    /// String, number, bool or null.
    Scalar(Scalar),
    /// Ordered list; positions are not part of an element's identity.
    Sequence(Vec<Value>),
    /// Insertion-ordered mapping from key to element.
    Keyed(Vec<(String, Value)>),
    /// Object exposing an explicit, ordered list of properties.
    Exposable(Arc<dyn Exposable>),
    /// Date/time value, rendered with [`crate::DEFAULT_DATE_FORMAT`].
    Temporal(DateTime<FixedOffset>),
    /// Deferred URI reference.
    Pointer(Box<Pointer>),
    /// Persistent resource resolvable to a public URI.
    Resource(ResourceRef),
    /// Anything else. Serializes to `null`.
    Opaque(OpaqueObject),
}

impl Value {
    /// The `null` scalar.
    pub const fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    /// Build a keyed container from `(key, value)` pairs, keeping their order.
    pub fn keyed<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Keyed(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a sequence from values.
    pub fn sequence<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Wrap an exposable object.
    pub fn exposable(object: impl Exposable + 'static) -> Self {
        Self::Exposable(Arc::new(object))
    }

    /// Wrap an arbitrary domain object that has no serializable form of its own.
    pub fn opaque<T: std::any::Any + Send + Sync>(object: T) -> Self {
        Self::Opaque(OpaqueObject::new(object))
    }

    /// Returns `true` for the `null` scalar.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }

    /// Returns `true` for sequences, keyed containers and exposable objects.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Sequence(_) | Self::Keyed(_) | Self::Exposable(_))
    }

    /// The pointer carried by this value, if any.
    pub fn as_pointer(&self) -> Option<&Pointer> {
        match self {
            Self::Pointer(p) => Some(p),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Sequence(_) => "sequence",
            Self::Keyed(_) => "keyed",
            Self::Exposable(_) => "exposable",
            Self::Temporal(_) => "temporal",
            Self::Pointer(_) => "pointer",
            Self::Resource(_) => "resource",
            Self::Opaque(_) => "opaque",
        }
    }

    /// Look up a direct child by key (or index, for sequences).
    ///
    /// Children of sequences and keyed containers are borrowed. Exposable
    /// objects are asked for the named property, which they hand out owned;
    /// only declared properties are ever returned.
    pub fn child(&self, key: &str) -> Option<Cow<'_, Value>> {
        match self {
            Self::Sequence(items) => key
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i))
                .map(Cow::Borrowed),
            Self::Keyed(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| Cow::Borrowed(v)),
            Self::Exposable(object) => object.property(key).map(Cow::Owned),
            _ => None,
        }
    }

    /// Like [`child`](Self::child), but moves the child out of an owned value.
    fn into_child(self, key: &str) -> Option<Value> {
        match self {
            Self::Sequence(items) => key
                .parse::<usize>()
                .ok()
                .and_then(|i| items.into_iter().nth(i)),
            Self::Keyed(entries) => entries.into_iter().find(|(k, _)| k == key).map(|(_, v)| v),
            Self::Exposable(object) => object.property(key),
            _ => None,
        }
    }

    /// Follow a dotted property path from this value.
    ///
    /// The empty path addresses the value itself. Nothing is copied while
    /// the path runs through sequences and keyed containers.
    pub fn at_path(&self, path: &str) -> Option<Cow<'_, Value>> {
        if path.is_empty() {
            return Some(Cow::Borrowed(self));
        }
        let mut current = Cow::Borrowed(self);
        for segment in path.split(PATH_SEPARATOR) {
            current = match current {
                Cow::Borrowed(value) => value.child(segment)?,
                Cow::Owned(value) => Cow::Owned(value.into_child(segment)?),
            };
        }
        Some(current)
    }

    /// Convert a plain JSON document. Objects become keyed containers.
    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Self::null(),
            JsonValue::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            JsonValue::Number(n) => Self::Scalar(Scalar::Number(n)),
            JsonValue::String(s) => Self::Scalar(Scalar::String(s)),
            JsonValue::Array(items) => Self::Sequence(items.into_iter().map(Self::from_json).collect()),
            JsonValue::Object(map) => {
                Self::Keyed(map.into_iter().map(|(k, v)| (k, Self::from_json(v))).collect())
            }
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::null()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Keyed(a), Self::Keyed(b)) => a == b,
            (Self::Exposable(a), Self::Exposable(b)) => Arc::ptr_eq(a, b),
            (Self::Temporal(a), Self::Temporal(b)) => a == b,
            (Self::Pointer(a), Self::Pointer(b)) => a == b,
            (Self::Resource(a), Self::Resource(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => a.same_object(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "Scalar({s:?})"),
            Self::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            Self::Keyed(entries) => f.debug_tuple("Keyed").field(entries).finish(),
            Self::Exposable(object) => f
                .debug_struct("Exposable")
                .field("type", &object.type_name())
                .field("identity", &object.identity())
                .finish(),
            Self::Temporal(dt) => write!(f, "Temporal({dt})"),
            Self::Pointer(p) => f.debug_tuple("Pointer").field(p).finish(),
            Self::Resource(r) => f.debug_tuple("Resource").field(r).finish(),
            Self::Opaque(o) => f.debug_tuple("Opaque").field(o).finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Scalar(Scalar::String(s))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Scalar(Scalar::Number(n.into()))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Scalar(Scalar::Number(n.into()))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Scalar(Scalar::Number(n.into()))
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no JSON form and become `null`.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Self::null(), |n| Self::Scalar(Scalar::Number(n)))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::null(), Into::into)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Sequence(items)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::Temporal(dt)
    }
}

impl From<Pointer> for Value {
    fn from(p: Pointer) -> Self {
        Self::Pointer(Box::new(p))
    }
}

impl From<ResourceRef> for Value {
    fn from(r: ResourceRef) -> Self {
        Self::Resource(r)
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        Self::from_json(json)
    }
}
