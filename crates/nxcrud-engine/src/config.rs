use serde::{Deserialize, Serialize};

use nxcrud_types::DEFAULT_DATE_FORMAT;

/// Configuration for the serialization engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum nesting depth of a walk, counting nested calls made by
    /// processors. Exceeding it fails with `DepthExceeded`.
    pub max_depth: usize,
    /// chrono format string for temporal values.
    pub date_format: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}
