use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::processor::MetaDataProcessor;

/// A path pattern paired with the processor it triggers.
#[derive(Clone)]
pub struct ProcessorBinding {
    name: String,
    pattern: Regex,
    processor: Arc<dyn MetaDataProcessor>,
}

impl ProcessorBinding {
    pub fn new(name: impl Into<String>, pattern: Regex, processor: Arc<dyn MetaDataProcessor>) -> Self {
        Self {
            name: name.into(),
            pattern,
            processor,
        }
    }

    /// Name of the binding in the settings.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn processor(&self) -> &dyn MetaDataProcessor {
        self.processor.as_ref()
    }

    /// Returns `true` if the binding applies to `property_path`.
    pub fn matches(&self, property_path: &str) -> bool {
        self.pattern.is_match(property_path)
    }
}

impl fmt::Debug for ProcessorBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorBinding")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("processor", &self.processor.name())
            .finish()
    }
}
