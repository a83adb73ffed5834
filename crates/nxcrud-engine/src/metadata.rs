use nxcrud_flatten::{flatten, flatten_with, unflatten, FlatMap, FlattenOptions};
use nxcrud_registry::{Metadata, ProcessorError};
use nxcrud_resolve::Resolver;
use nxcrud_types::{Value, PATH_SEPARATOR};
use serde_json::Value as JsonValue;
use tracing::trace;

use crate::context::{CallContext, CallState};
use crate::error::{EngineError, EngineResult};
use crate::service::{NestedScope, SerializationService};

/// Separates a property path from its metadata keys (`items.0#content`).
pub const METADATA_SEPARATOR: char = '#';

impl SerializationService {
    /// Run the call's bindings over every leaf of `tree` and merge the
    /// resulting metadata next to the data.
    ///
    /// Returns `tree` untouched when no processor produced anything. When
    /// metadata is attached below an array, that array comes back as an
    /// object since `0#flag` is not an index.
    pub(crate) fn apply_metadata(
        &self,
        tree: JsonValue,
        source: &Value,
        ctx: &mut CallContext,
        resolver: &dyn Resolver,
    ) -> EngineResult<JsonValue> {
        if !(tree.is_object() || tree.is_array()) || ctx.bindings.is_empty() {
            return Ok(tree);
        }

        ctx.transition(CallState::Flattening);
        let flat = flatten(&tree);

        ctx.transition(CallState::Enriching);
        let mut additional = FlatMap::new();
        for (path, value) in &flat {
            let scope = NestedScope {
                service: self,
                resolver,
                group: ctx.group.as_deref(),
                depth: ctx.base_depth + path.split(PATH_SEPARATOR).count(),
            };
            let mut metadata = Metadata::new();
            for (binding, storage) in ctx.bindings.iter().zip(ctx.storage.iter_mut()) {
                if !binding.matches(path) {
                    continue;
                }
                trace!(%path, binding = binding.name(), "running processor");
                metadata = binding
                    .processor()
                    .process(metadata, path, value, storage, source, &scope)
                    .map_err(|err| processor_failure(binding.name(), err))?;
            }
            if metadata.is_empty() {
                continue;
            }
            let prefix = format!("{path}{METADATA_SEPARATOR}");
            let options = FlattenOptions {
                prefix: &prefix,
                ..Default::default()
            };
            additional.extend(flatten_with(&JsonValue::Object(metadata), &options));
        }

        if additional.is_empty() {
            return Ok(tree);
        }

        ctx.transition(CallState::Merging);
        let mut merged = flat;
        merged.extend(additional);
        Ok(unflatten(&merged))
    }
}

/// Errors of nested serialization calls surface unchanged; anything else is
/// attributed to the binding.
fn processor_failure(binding: &str, err: ProcessorError) -> EngineError {
    match err {
        ProcessorError::Nested(inner) => match inner.downcast::<EngineError>() {
            Ok(engine) => *engine,
            Err(inner) => EngineError::Processor {
                binding: binding.to_string(),
                source: ProcessorError::Nested(inner),
            },
        },
        other => EngineError::Processor {
            binding: binding.to_string(),
            source: other,
        },
    }
}
