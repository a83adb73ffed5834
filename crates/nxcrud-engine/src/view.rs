use nxcrud_resolve::Resolver;
use nxcrud_types::Value;
use serde_json::{Map, Value as JsonValue};

use crate::error::EngineResult;
use crate::service::SerializationService;

/// Variable rendered when nothing else is configured.
pub const DEFAULT_VARIABLE: &str = "value";

/// Renders assigned variables of a controller action as JSON.
///
/// The processor group is the action identifier (see
/// [`action_identifier`](Self::action_identifier)), so each endpoint gets its
/// own metadata configuration.
#[derive(Debug)]
pub struct JsonView<'s> {
    service: &'s SerializationService,
    variables: Vec<(String, Value)>,
    variables_to_render: Vec<String>,
}

impl<'s> JsonView<'s> {
    pub fn new(service: &'s SerializationService) -> Self {
        Self {
            service,
            variables: Vec::new(),
            variables_to_render: vec![DEFAULT_VARIABLE.to_string()],
        }
    }

    /// `"{controller_object_name}\{action_name}Action"`.
    pub fn action_identifier(controller_object_name: &str, action_name: &str) -> String {
        format!("{controller_object_name}\\{action_name}Action")
    }

    /// Set a variable, replacing an earlier one of the same name.
    pub fn assign(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.variables.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.variables.push((name, value)),
        }
        self
    }

    pub fn set_variables_to_render<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables_to_render = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn variables_to_render(&self) -> &[String] {
        &self.variables_to_render
    }

    /// With one variable to render, its serialization (`null` if unassigned);
    /// with several, an object of all of them. Nothing to render encodes as
    /// an empty array.
    pub fn render_value(&self, resolver: &dyn Resolver, group: &str) -> EngineResult<JsonValue> {
        match self.variables_to_render.as_slice() {
            [] => return Ok(JsonValue::Array(Vec::new())),
            [name] => return self.render_variable(name, resolver, group),
            _ => {}
        }
        let mut out = Map::new();
        for name in &self.variables_to_render {
            out.insert(name.clone(), self.render_variable(name, resolver, group)?);
        }
        Ok(JsonValue::Object(out))
    }

    /// [`render_value`](Self::render_value), encoded.
    pub fn render(&self, resolver: &dyn Resolver, group: &str) -> EngineResult<String> {
        Ok(serde_json::to_string(&self.render_value(resolver, group)?)?)
    }

    fn render_variable(
        &self,
        name: &str,
        resolver: &dyn Resolver,
        group: &str,
    ) -> EngineResult<JsonValue> {
        match self.variables.iter().find(|(n, _)| n == name) {
            Some((_, value)) => self.service.process(value, resolver, Some(group)),
            None => Ok(JsonValue::Null),
        }
    }
}
