use std::fmt;
use std::sync::Arc;

use nxcrud_cache::SerializationCache;
use nxcrud_registry::{ProcessorError, ProcessorRegistry, ProcessorScope};
use nxcrud_resolve::Resolver;
use nxcrud_types::{DtoFactory, Value};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::config::EngineConfig;
use crate::context::{CallContext, CallState};
use crate::error::EngineResult;

// ---------------------------------------------------------------------------
// SerializationService
// ---------------------------------------------------------------------------

/// Turns domain values into JSON trees enriched with processor metadata.
///
/// The service holds configuration only. Every [`process`](Self::process)
/// call runs against its own call context, so one service can be shared
/// across threads and re-entered from processors.
pub struct SerializationService {
    registry: ProcessorRegistry,
    config: EngineConfig,
    cache: Option<Arc<dyn SerializationCache>>,
    dto_factory: Option<Arc<dyn DtoFactory>>,
}

impl SerializationService {
    pub fn new(registry: ProcessorRegistry) -> Self {
        Self {
            registry,
            config: EngineConfig::default(),
            cache: None,
            dto_factory: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Memoize serialized exposable objects that carry an identity.
    pub fn with_cache(mut self, cache: Arc<dyn SerializationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Factory used by processors to turn domain objects into DTOs.
    pub fn with_dto_factory(mut self, factory: Arc<dyn DtoFactory>) -> Self {
        self.dto_factory = Some(factory);
        self
    }

    pub fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn cache(&self) -> Option<&dyn SerializationCache> {
        self.cache.as_deref()
    }

    /// Serialize `value` and attach the metadata of processor `group`.
    ///
    /// Without a group, or with a group that has no bindings, the result is
    /// the plain serialized tree.
    pub fn process(
        &self,
        value: &Value,
        resolver: &dyn Resolver,
        group: Option<&str>,
    ) -> EngineResult<JsonValue> {
        self.process_at(value, resolver, group, 0)
    }

    /// [`process`](Self::process) and encode the result as a JSON string.
    pub fn json_encode(
        &self,
        value: &Value,
        resolver: &dyn Resolver,
        group: Option<&str>,
    ) -> EngineResult<String> {
        let tree = self.process(value, resolver, group)?;
        Ok(serde_json::to_string(&tree)?)
    }

    pub(crate) fn process_at(
        &self,
        value: &Value,
        resolver: &dyn Resolver,
        group: Option<&str>,
        base_depth: usize,
    ) -> EngineResult<JsonValue> {
        let bindings = self.registry.resolve_group(group)?;
        let mut ctx = CallContext::new(group, bindings, base_depth);
        debug!(
            group = group.unwrap_or_default(),
            depth = base_depth,
            bindings = ctx.bindings.len(),
            kind = value.kind(),
            "serialization started"
        );

        ctx.transition(CallState::Walking);
        let tree = self.walk(value, &mut ctx, resolver)?;
        let enriched = self.apply_metadata(tree, value, &mut ctx, resolver)?;
        ctx.transition(CallState::Done);

        debug!(
            group = group.unwrap_or_default(),
            depth = base_depth,
            state = %ctx.state(),
            "serialization finished"
        );
        Ok(enriched)
    }
}

impl fmt::Debug for SerializationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializationService")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("cache", &self.cache.is_some())
            .field("dto_factory", &self.dto_factory.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// NestedScope
// ---------------------------------------------------------------------------

/// The view of a running call handed to processors.
pub(crate) struct NestedScope<'a> {
    pub(crate) service: &'a SerializationService,
    pub(crate) resolver: &'a dyn Resolver,
    pub(crate) group: Option<&'a str>,
    /// Base depth for nested calls started from this scope.
    pub(crate) depth: usize,
}

impl ProcessorScope for NestedScope<'_> {
    fn group(&self) -> Option<&str> {
        self.group
    }

    fn resolver(&self) -> &dyn Resolver {
        self.resolver
    }

    fn dto_factory(&self) -> Option<&dyn DtoFactory> {
        self.service.dto_factory.as_deref()
    }

    fn serialize(&self, value: &Value) -> Result<JsonValue, ProcessorError> {
        self.service
            .process_at(value, self.resolver, self.group, self.depth)
            .map_err(|e| ProcessorError::Nested(Box::new(e)))
    }
}
