use serde_json::Value as JsonValue;

use crate::error::CacheResult;

/// Storage for serialized objects, keyed by [`cache_identifier`](crate::cache_identifier).
///
/// Implementations must be safe for concurrent use; the engine shares one
/// cache across all calls.
pub trait SerializationCache: Send + Sync {
    /// Look up a serialized object. Returns `Ok(None)` on a miss.
    fn get(&self, key: &str) -> CacheResult<Option<JsonValue>>;

    /// Store a serialized object together with its tags, replacing any
    /// previous entry.
    fn set(&self, key: &str, value: &JsonValue, tags: &[String]) -> CacheResult<()>;

    /// Check whether an entry exists.
    fn has(&self, key: &str) -> CacheResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Remove every entry carrying `tag`. Returns the number removed.
    fn flush_by_tag(&self, tag: &str) -> CacheResult<usize>;
}
