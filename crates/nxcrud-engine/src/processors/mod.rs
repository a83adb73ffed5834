//! Built-in metadata processors.
//!
//! | Name | Processor |
//! |---|---|
//! | `nested-object` | [`NestedObjectProcessor`] |
//! | `remote-content` | [`RemoteContentProcessor`] |
//! | `static` | [`StaticMetaDataProcessor`] |

pub mod fixed;
pub mod nested;
pub mod remote;

use std::sync::Arc;

use nxcrud_registry::{MetaDataProcessor, ProcessorCatalog};
use serde_json::Value as JsonValue;

pub use fixed::StaticMetaDataProcessor;
pub use nested::NestedObjectProcessor;
pub use remote::{ContentFetcher, FetchedContent, RemoteContentProcessor};

/// Metadata key under which embedded content is attached.
pub const CONTENT_KEY: &str = "content";

/// Register `nested-object` and `static`.
pub fn register_builtins(catalog: &mut ProcessorCatalog) {
    catalog.register(NestedObjectProcessor::NAME, Arc::new(NestedObjectProcessor));
    catalog.register_factory(StaticMetaDataProcessor::NAME, |options| {
        Ok(Arc::new(StaticMetaDataProcessor::from_options(options)?) as Arc<dyn MetaDataProcessor>)
    });
}

/// Register `remote-content` backed by `fetcher`.
pub fn register_remote_content(catalog: &mut ProcessorCatalog, fetcher: Arc<dyn ContentFetcher>) {
    catalog.register(
        RemoteContentProcessor::NAME,
        Arc::new(RemoteContentProcessor::new(fetcher)),
    );
}

/// A catalog with [`register_builtins`] applied.
pub fn builtin_catalog() -> ProcessorCatalog {
    let mut catalog = ProcessorCatalog::new();
    register_builtins(&mut catalog);
    catalog
}

/// Content that is not worth attaching: null, `false`, `0`, `""`, `"0"` and
/// empty containers.
pub(crate) fn is_blank(content: &JsonValue) -> bool {
    match content {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::Number(n) => n.as_f64() == Some(0.0),
        JsonValue::String(s) => s.is_empty() || s == "0",
        JsonValue::Array(items) => items.is_empty(),
        JsonValue::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_content() {
        for blank in [json!(null), json!(false), json!(0), json!(""), json!("0"), json!([]), json!({})] {
            assert!(is_blank(&blank), "{blank}");
        }
        for content in [json!(true), json!(1), json!("a"), json!([0]), json!({"a": null})] {
            assert!(!is_blank(&content), "{content}");
        }
    }

    #[test]
    fn builtins_are_registered() {
        let catalog = builtin_catalog();
        assert_eq!(catalog.names(), vec!["nested-object", "static"]);
    }
}
