use std::collections::BTreeSet;

use tracing::trace;

/// Stack of open tag scopes for one serialization call.
///
/// Each cached object opens a scope before serializing its properties.
/// Tags added while a scope is open belong to it; closing the scope hands its
/// tags to the enclosing one, so an outer entry is invalidated whenever any
/// object inside it is.
#[derive(Clone, Debug, Default)]
pub struct CacheEnvironment {
    scopes: Vec<BTreeSet<String>>,
}

impl CacheEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new innermost scope.
    pub fn open(&mut self) {
        self.scopes.push(BTreeSet::new());
        trace!(depth = self.scopes.len(), "cache environment opened");
    }

    /// Add `tag` to the innermost scope. Ignored when no scope is open.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(tag.into());
        }
    }

    /// Tags of the innermost scope, sorted.
    pub fn tags(&self) -> Vec<String> {
        self.scopes
            .last()
            .map(|scope| scope.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Close the innermost scope and return its tags, sorted.
    ///
    /// The tags are merged into the enclosing scope, if any.
    pub fn close(&mut self) -> Vec<String> {
        let Some(scope) = self.scopes.pop() else {
            return Vec::new();
        };
        if let Some(parent) = self.scopes.last_mut() {
            parent.extend(scope.iter().cloned());
        }
        trace!(depth = self.scopes.len(), tags = scope.len(), "cache environment closed");
        scope.into_iter().collect()
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_without_scope_are_dropped() {
        let mut env = CacheEnvironment::new();
        env.add_tag("a");
        assert!(env.tags().is_empty());
        assert!(env.close().is_empty());
    }

    #[test]
    fn closing_merges_into_parent() {
        let mut env = CacheEnvironment::new();
        env.open();
        env.add_tag("outer");
        env.open();
        env.add_tag("inner");
        env.add_tag("inner");
        assert_eq!(env.depth(), 2);
        assert_eq!(env.close(), vec!["inner"]);
        assert_eq!(env.tags(), vec!["inner", "outer"]);
        assert_eq!(env.close(), vec!["inner", "outer"]);
        assert_eq!(env.depth(), 0);
    }
}
