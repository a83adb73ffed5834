/// Errors from cache backends.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backend could not be reached or refused the operation.
    #[error("cache backend error: {0}")]
    Backend(String),

    /// A cached entry could not be encoded or decoded.
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
