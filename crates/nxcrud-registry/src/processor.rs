use std::collections::HashSet;

use nxcrud_resolve::Resolver;
use nxcrud_types::{DtoFactory, Value};
use serde_json::{Map, Value as JsonValue};

use crate::error::ProcessorError;

/// Metadata accumulated for one property path.
pub type Metadata = Map<String, JsonValue>;

// ---------------------------------------------------------------------------
// ProcessorStorage
// ---------------------------------------------------------------------------

/// Scratch space of one binding for the duration of one top-level call.
///
/// Every leaf visited during the call sees the same storage, so a processor
/// can remember work it already did. A new top-level call (including a nested
/// call made by a processor) starts with empty storage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessorStorage {
    slots: Map<String, JsonValue>,
    /// Processed leaves as JSON text.
    included: HashSet<String>,
}


impl ProcessorStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.slots.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut JsonValue> {
        self.slots.get_mut(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: JsonValue) -> Option<JsonValue> {
        self.slots.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        self.slots.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// Number of free-form slots. Included leaves are counted separately.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns `true` if `value` was recorded with [`mark_included`](Self::mark_included).
    pub fn is_included(&self, value: &JsonValue) -> bool {
        self.included.contains(&value.to_string())
    }

    /// Record that the content behind `value` has been handled in this call.
    pub fn mark_included(&mut self, value: &JsonValue) {
        self.included.insert(value.to_string());
    }

    /// Number of leaves recorded with [`mark_included`](Self::mark_included).
    pub fn included_len(&self) -> usize {
        self.included.len()
    }
}

// ---------------------------------------------------------------------------
// ProcessorScope
// ---------------------------------------------------------------------------

/// What a processor can reach of the call it runs in.
pub trait ProcessorScope {
    /// The processor group of the current call.
    fn group(&self) -> Option<&str>;

    /// The resolver bound to the current call.
    fn resolver(&self) -> &dyn Resolver;

    /// DTO factory configured on the engine, if any.
    fn dto_factory(&self) -> Option<&dyn DtoFactory>;

    /// Serialize `value` in a nested call with the same resolver and group.
    ///
    /// The nested call gets its own path and processor storage; the current
    /// call's state is unchanged when it returns.
    fn serialize(&self, value: &Value) -> Result<JsonValue, ProcessorError>;
}

// ---------------------------------------------------------------------------
// MetaDataProcessor
// ---------------------------------------------------------------------------

/// Computes metadata for a node of the serialized tree.
///
/// For each flattened leaf, every binding whose pattern matches the leaf's
/// path runs in configured order. Each processor receives the metadata
/// produced by the processors before it and returns the (possibly extended
/// or overwritten) map, so later bindings win on conflicting keys.
pub trait MetaDataProcessor: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Enrich `metadata` for the leaf at `property_path`.
    ///
    /// - `processed_value`: the already serialized leaf.
    /// - `storage`: this binding's scratch space for the current call.
    /// - `source`: the original value handed to the engine.
    fn process(
        &self,
        metadata: Metadata,
        property_path: &str,
        processed_value: &JsonValue,
        storage: &mut ProcessorStorage,
        source: &Value,
        scope: &dyn ProcessorScope,
    ) -> Result<Metadata, ProcessorError>;
}
