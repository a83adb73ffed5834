use nxcrud_registry::{
    MetaDataProcessor, Metadata, ProcessorError, ProcessorOptions, ProcessorScope, ProcessorStorage,
};
use nxcrud_types::Value;
use serde_json::Value as JsonValue;

/// Merges a fixed map into the metadata of every matching leaf, e.g.
/// `readOnly = true`. Configured keys overwrite earlier ones.
#[derive(Clone, Debug, Default)]
pub struct StaticMetaDataProcessor {
    entries: Metadata,
}

impl StaticMetaDataProcessor {
    pub const NAME: &'static str = "static";

    pub fn new(entries: Metadata) -> Self {
        Self { entries }
    }

    /// Build from binding options. At least one entry is required.
    pub fn from_options(options: &ProcessorOptions) -> Result<Self, String> {
        if options.is_empty() {
            return Err("no metadata entries configured".to_string());
        }
        Ok(Self::new(options.clone()))
    }
}

impl MetaDataProcessor for StaticMetaDataProcessor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(
        &self,
        mut metadata: Metadata,
        _property_path: &str,
        _processed_value: &JsonValue,
        _storage: &mut ProcessorStorage,
        _source: &Value,
        _scope: &dyn ProcessorScope,
    ) -> Result<Metadata, ProcessorError> {
        for (key, value) in &self.entries {
            metadata.insert(key.clone(), value.clone());
        }
        Ok(metadata)
    }
}
