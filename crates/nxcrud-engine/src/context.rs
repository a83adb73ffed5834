use std::fmt;

use nxcrud_cache::CacheEnvironment;
use nxcrud_registry::{ProcessorBinding, ProcessorStorage};
use nxcrud_types::PATH_SEPARATOR;
use tracing::trace;

use crate::error::{EngineError, EngineResult};

/// Phase of one serialization call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Walking,
    Flattening,
    Enriching,
    Merging,
    Done,
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Walking => "walking",
            Self::Flattening => "flattening",
            Self::Enriching => "enriching",
            Self::Merging => "merging",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Mutable state owned by exactly one `process()` call.
///
/// A nested call made by a processor builds its own context; the outer one
/// is never visible to it.
pub(crate) struct CallContext {
    pub(crate) path: Vec<String>,
    pub(crate) bindings: Vec<ProcessorBinding>,
    /// One slot per binding, same index.
    pub(crate) storage: Vec<ProcessorStorage>,
    pub(crate) group: Option<String>,
    /// Depth already used by enclosing calls.
    pub(crate) base_depth: usize,
    pub(crate) cache_env: CacheEnvironment,
    state: CallState,
}

impl CallContext {
    pub(crate) fn new(group: Option<&str>, bindings: Vec<ProcessorBinding>, base_depth: usize) -> Self {
        let storage = vec![ProcessorStorage::new(); bindings.len()];
        Self {
            path: Vec::new(),
            bindings,
            storage,
            group: group.map(str::to_string),
            base_depth,
            cache_env: CacheEnvironment::new(),
            state: CallState::Idle,
        }
    }

    pub(crate) fn state(&self) -> CallState {
        self.state
    }

    pub(crate) fn transition(&mut self, next: CallState) {
        trace!(from = %self.state, to = %next, depth = self.base_depth, "call state");
        self.state = next;
    }

    pub(crate) fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Current property path, dotted.
    pub(crate) fn property_path(&self) -> String {
        self.path.join(&PATH_SEPARATOR.to_string())
    }

    /// Descend into `key`, failing if that would exceed `limit`.
    pub(crate) fn enter(&mut self, key: String, limit: usize) -> EngineResult<()> {
        if self.base_depth + self.path.len() >= limit {
            return Err(EngineError::DepthExceeded {
                limit,
                path: self.property_path(),
            });
        }
        self.path.push(key);
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_and_leave_track_path() {
        let mut ctx = CallContext::new(Some("g"), Vec::new(), 0);
        ctx.enter("items".into(), 4).unwrap();
        ctx.enter("0".into(), 4).unwrap();
        assert_eq!(ctx.property_path(), "items.0");
        ctx.leave();
        assert_eq!(ctx.property_path(), "items");
        assert_eq!(ctx.group(), Some("g"));
    }

    #[test]
    fn depth_limit_includes_base_depth() {
        let mut ctx = CallContext::new(None, Vec::new(), 2);
        ctx.enter("a".into(), 3).unwrap();
        let err = ctx.enter("b".into(), 3).unwrap_err();
        assert!(matches!(err, EngineError::DepthExceeded { limit: 3, ref path } if path == "a"));
    }

    #[test]
    fn transitions() {
        let mut ctx = CallContext::new(None, Vec::new(), 0);
        assert_eq!(ctx.state(), CallState::Idle);
        ctx.transition(CallState::Walking);
        assert_eq!(ctx.state(), CallState::Walking);
        assert_eq!(CallState::Merging.to_string(), "merging");
    }
}
