use nxcrud_registry::{MetaDataProcessor, Metadata, ProcessorError, ProcessorScope, ProcessorStorage};
use nxcrud_types::{DtoFactory, Value};
use serde_json::Value as JsonValue;
use tracing::trace;

use super::{is_blank, CONTENT_KEY};

/// Embeds the object a pointer refers to.
///
/// Applies to leaves whose source value is a [`Pointer`](nxcrud_types::Pointer).
/// Instead of fetching the pointer's URI, the object it would show is
/// serialized in place through a nested call with the same resolver and
/// group, and attached as `content`. The object is the pointer's inline
/// representative if it has one, else its only argument, else all arguments.
///
/// Each URI is embedded at most once per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct NestedObjectProcessor;

impl NestedObjectProcessor {
    pub const NAME: &'static str = "nested-object";
}

impl MetaDataProcessor for NestedObjectProcessor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(
        &self,
        mut metadata: Metadata,
        property_path: &str,
        processed_value: &JsonValue,
        storage: &mut ProcessorStorage,
        source: &Value,
        scope: &dyn ProcessorScope,
    ) -> Result<Metadata, ProcessorError> {
        if storage.is_included(processed_value) {
            return Ok(metadata);
        }
        let leaf = source.at_path(property_path);
        let Some(Value::Pointer(pointer)) = leaf.as_deref() else {
            return Ok(metadata);
        };

        let factory = scope.dto_factory();
        let arguments = pointer.arguments();
        let target = match (pointer.inline_representative(), arguments.first()) {
            (Some(representative), _) => representative_dto(representative, factory),
            (None, Some(only)) if arguments.len() == 1 => representative_dto(only, factory),
            (None, _) => arguments.to_value(),
        };

        let content = scope.serialize(&target)?;
        if !is_blank(&content) {
            trace!(path = property_path, "embedding nested object");
            metadata.insert(CONTENT_KEY.to_string(), content);
        }
        storage.mark_included(processed_value);
        Ok(metadata)
    }
}

/// Map a representative to something worth serializing: containers element
/// by element, exposables as they are, domain objects through the DTO
/// factory. Anything else maps to an empty container.
fn representative_dto(value: &Value, factory: Option<&dyn DtoFactory>) -> Value {
    match value {
        Value::Sequence(items) => {
            Value::Sequence(items.iter().map(|item| representative_dto(item, factory)).collect())
        }
        Value::Keyed(entries) => Value::Keyed(
            entries
                .iter()
                .map(|(key, item)| (key.clone(), representative_dto(item, factory)))
                .collect(),
        ),
        Value::Exposable(_) => value.clone(),
        Value::Opaque(object) => factory
            .and_then(|factory| factory.dto_for(object))
            .map(Value::Exposable)
            .unwrap_or_else(|| Value::Keyed(Vec::new())),
        _ => Value::Keyed(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nxcrud_types::{Dto, MappedDtoFactory};

    struct Chair {
        legs: i64,
    }

    #[test]
    fn domain_objects_go_through_the_factory() {
        let mut factory = MappedDtoFactory::new();
        factory.register::<Chair, _, _>(|chair: &Chair| {
            let legs = chair.legs;
            Dto::new(()).expose("legs", move |_| Value::from(legs))
        });
        let mapped = representative_dto(
            &Value::sequence([Value::opaque(Chair { legs: 4 }), Value::from("x")]),
            Some(&factory as &dyn DtoFactory),
        );
        let Value::Sequence(items) = mapped else {
            panic!("expected a sequence");
        };
        assert!(matches!(&items[0], Value::Exposable(dto) if dto.property("legs") == Some(Value::from(4))));
        assert_eq!(items[1], Value::Keyed(Vec::new()));
    }

    #[test]
    fn unknown_objects_map_to_empty() {
        let mapped = representative_dto(&Value::opaque(Chair { legs: 3 }), None);
        assert_eq!(mapped, Value::Keyed(Vec::new()));
    }
}
