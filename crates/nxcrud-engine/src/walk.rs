use std::fmt::Write;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use nxcrud_cache::{cache_identifier, identity_tag};
use nxcrud_resolve::Resolver;
use nxcrud_types::{Exposable, Value};
use serde_json::{Map, Value as JsonValue};
use tracing::trace;

use crate::context::CallContext;
use crate::error::{EngineError, EngineResult};
use crate::service::SerializationService;

impl SerializationService {
    /// Serialize `value` without metadata.
    pub(crate) fn walk(
        &self,
        value: &Value,
        ctx: &mut CallContext,
        resolver: &dyn Resolver,
    ) -> EngineResult<JsonValue> {
        match value {
            Value::Scalar(scalar) => Ok(scalar.to_json()),
            Value::Sequence(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    out.push(self.walk_child(index.to_string(), item, ctx, resolver)?);
                }
                Ok(JsonValue::Array(out))
            }
            Value::Keyed(entries) => {
                let mut out = Map::new();
                for (key, item) in entries {
                    let json = self.walk_child(key.clone(), item, ctx, resolver)?;
                    out.insert(key.clone(), json);
                }
                Ok(JsonValue::Object(out))
            }
            Value::Exposable(object) => self.walk_exposable(object, ctx, resolver),
            Value::Temporal(moment) => self.format_temporal(moment).map(JsonValue::String),
            Value::Pointer(pointer) => {
                let uri = resolver.resolve_pointer(
                    pointer.action(),
                    pointer.arguments(),
                    pointer.controller(),
                    pointer.package(),
                    pointer.sub_package(),
                )?;
                trace!(path = %ctx.property_path(), %uri, "pointer resolved");
                Ok(JsonValue::String(uri))
            }
            Value::Resource(resource) => Ok(JsonValue::String(resolver.resolve_resource(resource)?)),
            Value::Opaque(object) => {
                trace!(path = %ctx.property_path(), type_name = object.type_name(), "unrepresentable value");
                Ok(JsonValue::Null)
            }
        }
    }

    fn walk_child(
        &self,
        key: String,
        child: &Value,
        ctx: &mut CallContext,
        resolver: &dyn Resolver,
    ) -> EngineResult<JsonValue> {
        ctx.enter(key, self.config().max_depth)?;
        let result = self.walk(child, ctx, resolver);
        ctx.leave();
        result
    }

    fn walk_properties(
        &self,
        object: &Arc<dyn Exposable>,
        ctx: &mut CallContext,
        resolver: &dyn Resolver,
    ) -> EngineResult<JsonValue> {
        let mut out = Map::new();
        for name in object.exposed_property_names() {
            let property = object.property(&name).unwrap_or_default();
            let json = self.walk_child(name.clone(), &property, ctx, resolver)?;
            out.insert(name, json);
        }
        Ok(JsonValue::Object(out))
    }

    /// Exposable objects with an identity are memoized when a cache is bound.
    fn walk_exposable(
        &self,
        object: &Arc<dyn Exposable>,
        ctx: &mut CallContext,
        resolver: &dyn Resolver,
    ) -> EngineResult<JsonValue> {
        let (Some(cache), Some(identity)) = (self.cache(), object.identity()) else {
            return self.walk_properties(object, ctx, resolver);
        };
        let key = cache_identifier(ctx.group(), &identity);

        ctx.cache_env.open();
        ctx.cache_env.add_tag(identity_tag(&identity));
        let result: EngineResult<JsonValue> = match cache.get(&key) {
            Ok(Some(hit)) => {
                trace!(%identity, "serialization cache hit");
                Ok(hit)
            }
            Ok(None) => match self.walk_properties(object, ctx, resolver) {
                Ok(tree) => cache
                    .set(&key, &tree, &ctx.cache_env.tags())
                    .map(|()| tree)
                    .map_err(Into::into),
                Err(err) => Err(err),
            },
            Err(err) => Err(err.into()),
        };
        ctx.cache_env.close();
        result
    }

    fn format_temporal(&self, moment: &DateTime<FixedOffset>) -> EngineResult<String> {
        let format = &self.config().date_format;
        let mut out = String::new();
        write!(out, "{}", moment.format(format))
            .map_err(|_| EngineError::InvalidDateFormat(format.clone()))?;
        Ok(out)
    }
}
