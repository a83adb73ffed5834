use nxcrud_cache::CacheError;
use nxcrud_registry::{ProcessorError, RegistryError};
use nxcrud_resolve::ResolveError;

/// Errors that abort a serialization call.
///
/// No partial tree is ever returned alongside an error.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A pointer or resource could not be resolved.
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// Processor settings could not be loaded or, in strict mode, a binding
    /// was invalid.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The cache backend failed.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// A metadata processor failed.
    #[error("processor '{binding}' failed: {source}")]
    Processor {
        binding: String,
        #[source]
        source: ProcessorError,
    },

    /// The value graph is nested deeper than allowed; usually a cycle.
    #[error("maximum depth {limit} exceeded at '{path}'")]
    DepthExceeded { limit: usize, path: String },

    /// The configured date format could not render a value.
    #[error("invalid date format '{0}'")]
    InvalidDateFormat(String),

    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
