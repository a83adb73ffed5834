use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use crate::error::{RegistryError, RegistryResult};
use crate::processor::MetaDataProcessor;

/// Per-binding options from the settings file.
pub type ProcessorOptions = Map<String, JsonValue>;

type Factory =
    Arc<dyn Fn(&ProcessorOptions) -> Result<Arc<dyn MetaDataProcessor>, String> + Send + Sync>;

/// Processor references usable from settings, by name.
///
/// Each name maps to a factory so that bindings can carry their own options.
/// Processors registered as instances ignore options and are shared by every
/// binding that names them.
#[derive(Clone, Default)]
pub struct ProcessorCatalog {
    factories: HashMap<String, Factory>,
}

impl ProcessorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ready-made processor under `name`.
    pub fn register(&mut self, name: impl Into<String>, processor: Arc<dyn MetaDataProcessor>) {
        self.factories
            .insert(name.into(), Arc::new(move |_| Ok(Arc::clone(&processor))));
    }

    /// Register a factory that builds a processor from binding options.
    pub fn register_factory<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&ProcessorOptions) -> Result<Arc<dyn MetaDataProcessor>, String>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Build the processor `name` with `options`.
    pub fn instantiate(
        &self,
        name: &str,
        options: &ProcessorOptions,
    ) -> RegistryResult<Arc<dyn MetaDataProcessor>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| RegistryError::UnknownProcessor(name.to_string()))?;
        factory(options).map_err(|reason| RegistryError::InvalidOptions {
            processor: name.to_string(),
            reason,
        })
    }
}

impl fmt::Debug for ProcessorCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorCatalog")
            .field("processors", &self.names())
            .finish()
    }
}
