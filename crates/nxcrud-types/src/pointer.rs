use crate::error::TypeError;
use crate::value::{Scalar, Value};

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// Ordered, named pointer arguments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments(Vec<(String, Value)>);

impl Arguments {
    /// No arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument. A repeated name replaces the earlier value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Look up an argument by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Iterate arguments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The first argument, if any.
    pub fn first(&self) -> Option<&Value> {
        self.0.first().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All arguments as a keyed container.
    pub fn to_value(&self) -> Value {
        Value::Keyed(self.0.clone())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (k, v) in iter {
            args.insert(k, v);
        }
        args
    }
}

// ---------------------------------------------------------------------------
// Pointer
// ---------------------------------------------------------------------------

/// A deferred URI: everything needed to build the URI of a controller action,
/// held until a resolver is available.
///
/// The optional inline representative is the object the target action would
/// render. The base serialization ignores it; metadata processors use it to
/// embed the pointed-to content.
#[derive(Clone, Debug, PartialEq)]
pub struct Pointer {
    action: String,
    arguments: Arguments,
    controller: Option<String>,
    package: Option<String>,
    sub_package: Option<String>,
    inline_representative: Option<Value>,
}

impl Pointer {
    /// Start building a pointer to `action`.
    pub fn builder(action: impl Into<String>) -> PointerBuilder {
        PointerBuilder {
            pointer: Self {
                action: action.into(),
                arguments: Arguments::new(),
                controller: None,
                package: None,
                sub_package: None,
                inline_representative: None,
            },
        }
    }

    /// Build a pointer from loosely named properties.
    ///
    /// Accepted names are `actionName`, `arguments`, `controllerName`,
    /// `packageKey`, `subPackageKey` and `inlineRepresentative`. Any other
    /// name is rejected.
    pub fn from_properties<I>(properties: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut action = None;
        let mut builder = Self::builder(String::new());
        for (name, value) in properties {
            match name.as_str() {
                "actionName" => action = Some(text_property(&name, value)?),
                "controllerName" => builder = builder.controller(text_property(&name, value)?),
                "packageKey" => builder = builder.package(text_property(&name, value)?),
                "subPackageKey" => builder = builder.sub_package(text_property(&name, value)?),
                "arguments" => match value {
                    Value::Keyed(entries) => {
                        for (k, v) in entries {
                            builder = builder.argument(k, v);
                        }
                    }
                    Value::Scalar(Scalar::Null) => {}
                    _ => {
                        return Err(TypeError::InvalidPointerProperty {
                            property: name,
                            expected: "a keyed container",
                        })
                    }
                },
                "inlineRepresentative" => builder = builder.inline_representative(value),
                _ => return Err(TypeError::UnknownPointerProperty(name)),
            }
        }
        let action = action.filter(|a| !a.is_empty()).ok_or(TypeError::MissingAction)?;
        builder.pointer.action = action;
        Ok(builder.build())
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn controller(&self) -> Option<&str> {
        self.controller.as_deref()
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn sub_package(&self) -> Option<&str> {
        self.sub_package.as_deref()
    }

    pub fn inline_representative(&self) -> Option<&Value> {
        self.inline_representative.as_ref()
    }
}

fn text_property(name: &str, value: Value) -> Result<String, TypeError> {
    match value {
        Value::Scalar(Scalar::String(s)) => Ok(s),
        _ => Err(TypeError::InvalidPointerProperty {
            property: name.to_string(),
            expected: "a string",
        }),
    }
}

/// Builder for [`Pointer`].
#[derive(Clone, Debug)]
pub struct PointerBuilder {
    pointer: Pointer,
}

impl PointerBuilder {
    pub fn argument(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.pointer.arguments.insert(name, value);
        self
    }

    pub fn arguments(mut self, arguments: Arguments) -> Self {
        self.pointer.arguments = arguments;
        self
    }

    pub fn controller(mut self, controller: impl Into<String>) -> Self {
        self.pointer.controller = Some(controller.into());
        self
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.pointer.package = Some(package.into());
        self
    }

    pub fn sub_package(mut self, sub_package: impl Into<String>) -> Self {
        self.pointer.sub_package = Some(sub_package.into());
        self
    }

    pub fn inline_representative(mut self, value: impl Into<Value>) -> Self {
        self.pointer.inline_representative = Some(value.into());
        self
    }

    pub fn build(self) -> Pointer {
        self.pointer
    }
}
