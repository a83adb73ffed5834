use std::path::PathBuf;

/// Errors from loading settings and resolving processor groups.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A binding is missing its pattern or processor, or either is invalid.
    #[error("invalid processor binding '{binding}': {reason}")]
    InvalidBinding { binding: String, reason: String },

    /// A group value is neither a list of names nor a comma-separated string.
    #[error("invalid processor group '{group}': {reason}")]
    InvalidGroup { group: String, reason: String },

    /// The processor reference is not in the catalog.
    #[error("unknown processor '{0}'")]
    UnknownProcessor(String),

    /// The processor rejected its configured options.
    #[error("invalid options for processor '{processor}': {reason}")]
    InvalidOptions { processor: String, reason: String },

    /// The settings file could not be read.
    #[error("cannot read settings from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings could not be parsed.
    #[error("settings parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl RegistryError {
    pub fn invalid_binding(binding: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBinding {
            binding: binding.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised by a metadata processor.
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    /// Generic processor failure.
    #[error("{0}")]
    Failed(String),

    /// A nested serialization run failed.
    #[error("nested serialization failed: {0}")]
    Nested(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Fetching remote content failed.
    #[error("fetching '{uri}' failed: {reason}")]
    Fetch { uri: String, reason: String },

    /// Content was not valid JSON.
    #[error("invalid JSON content: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProcessorError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
