use crate::value::Value;

/// An object that declares which of its properties reach the API.
///
/// Only names returned by [`exposed_property_names`](Exposable::exposed_property_names)
/// are serialized, in that order. [`property`](Exposable::property) is the
/// explicit delegation to whatever the object wraps; returning `None` for a
/// declared name serializes as `null`.
pub trait Exposable: Send + Sync {
    /// Ordered list of property names to serialize.
    fn exposed_property_names(&self) -> Vec<String>;

    /// Value of a declared property.
    fn property(&self, name: &str) -> Option<Value>;

    /// Persistence identifier of the wrapped object, if it has one.
    ///
    /// Used to key cached serializations, as cache tag, and as the text form
    /// when the object is a pointer argument.
    fn identity(&self) -> Option<String> {
        None
    }

    /// Type name for diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

type Getter<P> = Box<dyn Fn(&P) -> Value + Send + Sync>;

/// A data transfer object: a payload plus a whitelist of exposed getters.
///
/// ```
/// use nxcrud_types::{Dto, Exposable, Value};
///
/// struct Item { title: String, secret: String }
///
/// let dto = Dto::new(Item { title: "Chair".into(), secret: "x".into() })
///     .with_identity("item-1")
///     .expose("title", |item| Value::from(item.title.as_str()));
/// assert_eq!(dto.exposed_property_names(), vec!["title".to_string()]);
/// assert_eq!(dto.property("secret"), None);
/// ```
pub struct Dto<P> {
    payload: P,
    identity: Option<String>,
    getters: Vec<(String, Getter<P>)>,
}

impl<P: Send + Sync + 'static> Dto<P> {
    pub fn new(payload: P) -> Self {
        Self {
            payload,
            identity: None,
            getters: Vec::new(),
        }
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Declare an exposed property backed by `getter`.
    pub fn expose<F>(mut self, name: impl Into<String>, getter: F) -> Self
    where
        F: Fn(&P) -> Value + Send + Sync + 'static,
    {
        self.getters.push((name.into(), Box::new(getter)));
        self
    }

    /// The wrapped payload. Never exposed itself.
    pub fn payload(&self) -> &P {
        &self.payload
    }
}

impl<P: Send + Sync + 'static> Exposable for Dto<P> {
    fn exposed_property_names(&self) -> Vec<String> {
        self.getters.iter().map(|(name, _)| name.clone()).collect()
    }

    fn property(&self, name: &str) -> Option<Value> {
        self.getters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, getter)| getter(&self.payload))
    }

    fn identity(&self) -> Option<String> {
        self.identity.clone()
    }
}

impl<P> std::fmt::Debug for Dto<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dto")
            .field("identity", &self.identity)
            .field(
                "exposed",
                &self.getters.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
