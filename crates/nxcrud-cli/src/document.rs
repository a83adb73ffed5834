//! JSON documents with embedded pointers and resources.
//!
//! `{"@pointer": {"actionName": "show", "arguments": {"id": 1}}}` becomes a
//! pointer and `{"@resource": {"sha1": "..", "filename": ".."}}` a resource.
//! Everything else maps to plain values.

use anyhow::{bail, Context};
use nxcrud_types::{Pointer, ResourceRef, Value};
use serde_json::Value as JsonValue;

const POINTER_KEY: &str = "@pointer";
const RESOURCE_KEY: &str = "@resource";

pub fn to_value(json: JsonValue) -> anyhow::Result<Value> {
    match json {
        JsonValue::Array(items) => Ok(Value::Sequence(
            items.into_iter().map(to_value).collect::<anyhow::Result<_>>()?,
        )),
        JsonValue::Object(mut map) => {
            if map.len() == 1 {
                if let Some(properties) = map.remove(POINTER_KEY) {
                    return pointer(properties).map(Value::from);
                }
                if let Some(resource) = map.remove(RESOURCE_KEY) {
                    let resource: ResourceRef =
                        serde_json::from_value(resource).context("invalid @resource")?;
                    return Ok(Value::from(resource));
                }
            }
            let entries = map
                .into_iter()
                .map(|(key, value)| Ok((key, to_value(value)?)))
                .collect::<anyhow::Result<Vec<_>>>()?;
            Ok(Value::Keyed(entries))
        }
        scalar => Ok(Value::from_json(scalar)),
    }
}

fn pointer(properties: JsonValue) -> anyhow::Result<Pointer> {
    let JsonValue::Object(map) = properties else {
        bail!("@pointer must be an object");
    };
    let properties = map
        .into_iter()
        .map(|(key, value)| Ok((key, to_value(value)?)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Pointer::from_properties(properties).context("invalid @pointer")
}
