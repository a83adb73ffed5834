use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::RwLock;

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::CacheResult;
use crate::traits::SerializationCache;

#[derive(Clone)]
struct CacheEntry {
    value: JsonValue,
    tags: BTreeSet<String>,
}

/// In-memory, HashMap-based serialization cache.
///
/// Intended for tests and single-process embedding. Entries are cloned on
/// read and write.
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().expect("lock poisoned").clear();
    }

    /// Tags stored with `key`, sorted.
    pub fn tags_of(&self, key: &str) -> Option<Vec<String>> {
        let map = self.entries.read().expect("lock poisoned");
        map.get(key).map(|entry| entry.tags.iter().cloned().collect())
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SerializationCache for InMemoryCache {
    fn get(&self, key: &str) -> CacheResult<Option<JsonValue>> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.get(key).map(|entry| entry.value.clone()))
    }

    fn set(&self, key: &str, value: &JsonValue, tags: &[String]) -> CacheResult<()> {
        let entry = CacheEntry {
            value: value.clone(),
            tags: tags.iter().cloned().collect(),
        };
        self.entries
            .write()
            .expect("lock poisoned")
            .insert(key.to_string(), entry);
        Ok(())
    }

    fn has(&self, key: &str) -> CacheResult<bool> {
        Ok(self.entries.read().expect("lock poisoned").contains_key(key))
    }

    fn flush_by_tag(&self, tag: &str) -> CacheResult<usize> {
        let mut map = self.entries.write().expect("lock poisoned");
        let before = map.len();
        map.retain(|_, entry| !entry.tags.contains(tag));
        let removed = before - map.len();
        debug!(tag, removed, "flushed cache entries by tag");
        Ok(removed)
    }
}

impl fmt::Debug for InMemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryCache")
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn set_then_get() {
        let cache = InMemoryCache::new();
        assert_eq!(cache.get("k").unwrap(), None);
        cache.set("k", &json!({"a": 1}), &tags(&["t"])).unwrap();
        assert_eq!(cache.get("k").unwrap(), Some(json!({"a": 1})));
        assert!(cache.has("k").unwrap());
        assert_eq!(cache.tags_of("k"), Some(vec!["t".to_string()]));
    }

    #[test]
    fn set_replaces() {
        let cache = InMemoryCache::new();
        cache.set("k", &json!(1), &tags(&["a"])).unwrap();
        cache.set("k", &json!(2), &tags(&["b"])).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k").unwrap(), Some(json!(2)));
        assert_eq!(cache.flush_by_tag("a").unwrap(), 0);
    }

    #[test]
    fn flush_by_tag_removes_all_tagged() {
        let cache = InMemoryCache::new();
        cache.set("outer", &json!(1), &tags(&["item", "list"])).unwrap();
        cache.set("inner", &json!(2), &tags(&["item"])).unwrap();
        cache.set("other", &json!(3), &tags(&["other"])).unwrap();
        assert_eq!(cache.flush_by_tag("item").unwrap(), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.has("other").unwrap());
    }

    #[test]
    fn clear_empties() {
        let cache = InMemoryCache::default();
        cache.set("k", &json!(null), &[]).unwrap();
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
