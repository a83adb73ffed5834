//! Template routes for controller actions.
//!
//! A route maps `(package, sub_package, controller, action)` to a URI
//! template such as `/items/{id}`. Placeholders are filled from the pointer's
//! arguments; arguments the template does not consume become the query
//! string, in argument order.
//!
//! ```
//! use nxcrud_resolve::{Route, RouteTable};
//! use nxcrud_types::Arguments;
//!
//! let table = RouteTable::new("https://shop.example").with_route(Route::new("show", "/items/{id}"));
//! let args: Arguments = [("id", "42")].into_iter().collect();
//! let uri = table.uri_for("show", &args, None, None, None).unwrap();
//! assert_eq!(uri, "https://shop.example/items/42");
//! ```

use nxcrud_types::{format_temporal, Arguments, Scalar, Value};
use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, ResolveResult};

/// One route. Unset scopes match any pointer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_package: Option<String>,
    pub template: String,
}

impl Route {
    pub fn new(action: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            controller: None,
            package: None,
            sub_package: None,
            template: template.into(),
        }
    }

    pub fn controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = Some(controller.into());
        self
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn sub_package(mut self, sub_package: impl Into<String>) -> Self {
        self.sub_package = Some(sub_package.into());
        self
    }

    fn matches(
        &self,
        action: &str,
        controller: Option<&str>,
        package: Option<&str>,
        sub_package: Option<&str>,
    ) -> bool {
        fn scope(route: &Option<String>, pointer: Option<&str>) -> bool {
            route.as_deref().map_or(true, |r| Some(r) == pointer)
        }
        self.action == action
            && scope(&self.controller, controller)
            && scope(&self.package, package)
            && scope(&self.sub_package, sub_package)
    }
}

/// Ordered list of routes; the first match wins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    /// Prefix for absolute URIs. Empty for relative URIs.
    #[serde(default)]
    pub base_uri: String,
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            routes: Vec::new(),
        }
    }

    /// Parse a table from TOML (`base_uri` plus `[[routes]]` entries).
    pub fn from_toml_str(source: &str) -> ResolveResult<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Build the URI for an action.
    pub fn uri_for(
        &self,
        action: &str,
        arguments: &Arguments,
        controller: Option<&str>,
        package: Option<&str>,
        sub_package: Option<&str>,
    ) -> ResolveResult<String> {
        let route = self
            .routes
            .iter()
            .find(|r| r.matches(action, controller, package, sub_package))
            .ok_or_else(|| ResolveError::UnknownRoute {
                action: action.to_string(),
                controller: controller.map(str::to_string),
                package: package.map(str::to_string),
            })?;

        let (path, consumed) = expand_template(&route.template, arguments)?;

        let mut query = Vec::new();
        for (name, value) in arguments.iter() {
            if !consumed.iter().any(|c| c == name) {
                append_query(&mut query, name.to_string(), name, value)?;
            }
        }

        let mut uri = format!("{}{}", self.base_uri.trim_end_matches('/'), path);
        if !query.is_empty() {
            uri.push('?');
            uri.push_str(&query.join("&"));
        }
        tracing::trace!(action, uri = %uri, "pointer resolved");
        Ok(uri)
    }
}

/// Fill `{name}` placeholders. Returns the path and the consumed names.
fn expand_template(template: &str, arguments: &Arguments) -> ResolveResult<(String, Vec<String>)> {
    let mut path = String::with_capacity(template.len());
    let mut consumed = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        path.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| ResolveError::InvalidTemplate(template.to_string()))?;
        let name = &after[..close];
        if name.is_empty() || name.contains('{') {
            return Err(ResolveError::InvalidTemplate(template.to_string()));
        }
        let text = arguments
            .get(name)
            .map(|value| argument_text(name, value))
            .transpose()?
            .flatten()
            .ok_or_else(|| ResolveError::MissingArgument {
                template: template.to_string(),
                argument: name.to_string(),
            })?;
        path.push_str(&encode_component(&text));
        consumed.push(name.to_string());
        rest = &after[close + 1..];
    }
    if rest.contains('}') {
        return Err(ResolveError::InvalidTemplate(template.to_string()));
    }
    path.push_str(rest);
    Ok((path, consumed))
}

/// Text form of a single argument. `Ok(None)` for null.
fn argument_text(name: &str, value: &Value) -> ResolveResult<Option<String>> {
    match value {
        Value::Scalar(scalar) => Ok(scalar.to_text()),
        Value::Temporal(dt) => Ok(Some(format_temporal(dt))),
        Value::Exposable(object) => object.identity().map(Some).ok_or_else(|| {
            ResolveError::UnrenderableArgument {
                argument: name.to_string(),
                kind: "exposable without identity",
            }
        }),
        other => Err(ResolveError::UnrenderableArgument {
            argument: name.to_string(),
            kind: other.kind(),
        }),
    }
}

/// Append `key=value` pairs; containers nest as `key[child]=value`.
fn append_query(
    pairs: &mut Vec<String>,
    key: String,
    name: &str,
    value: &Value,
) -> ResolveResult<()> {
    match value {
        Value::Scalar(Scalar::Null) => {}
        Value::Keyed(entries) => {
            for (child, v) in entries {
                append_query(pairs, format!("{key}[{child}]"), name, v)?;
            }
        }
        Value::Sequence(items) => {
            for (i, v) in items.iter().enumerate() {
                append_query(pairs, format!("{key}[{i}]"), name, v)?;
            }
        }
        other => {
            if let Some(text) = argument_text(name, other)? {
                pairs.push(format!("{}={}", encode_component(&key), encode_component(&text)));
            }
        }
    }
    Ok(())
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
