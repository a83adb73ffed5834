use std::sync::Arc;

use nxcrud_registry::{MetaDataProcessor, Metadata, ProcessorError, ProcessorScope, ProcessorStorage};
use nxcrud_types::Value;
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use super::{is_blank, CONTENT_KEY};

/// Response of a [`ContentFetcher`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedContent {
    pub status: u16,
    pub body: String,
}

impl FetchedContent {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Synchronous `GET` of a URI, asking for JSON.
///
/// No transport ships with the engine. Callers implement this over their own
/// HTTP client and register the processor with
/// [`register_remote_content`](crate::register_remote_content); the
/// `nxcrud render` command only knows the built-in catalog, so
/// `remote-content` bindings resolve as unknown processors there (skipped,
/// or rejected with `--strict`).
pub trait ContentFetcher: Send + Sync {
    fn fetch(&self, uri: &str) -> Result<FetchedContent, ProcessorError>;
}

/// Pre-fetches the document a URI leaf points to and attaches it as
/// `content`.
///
/// Only `200` responses are used. Bodies that are not JSON, are blank, or are
/// the error envelope `{"errors": .., "resourceArgumentName": ..}` (which
/// some caches serve with status 200) are dropped. Each URI is fetched at
/// most once per call.
pub struct RemoteContentProcessor {
    fetcher: Arc<dyn ContentFetcher>,
}

impl RemoteContentProcessor {
    pub const NAME: &'static str = "remote-content";

    pub fn new(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self { fetcher }
    }
}

impl std::fmt::Debug for RemoteContentProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteContentProcessor").finish_non_exhaustive()
    }
}

impl MetaDataProcessor for RemoteContentProcessor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(
        &self,
        mut metadata: Metadata,
        property_path: &str,
        processed_value: &JsonValue,
        storage: &mut ProcessorStorage,
        _source: &Value,
        _scope: &dyn ProcessorScope,
    ) -> Result<Metadata, ProcessorError> {
        if storage.is_included(processed_value) {
            return Ok(metadata);
        }
        let Some(uri) = processed_value.as_str() else {
            return Ok(metadata);
        };

        let response = self.fetcher.fetch(uri)?;
        trace!(path = property_path, uri, status = response.status, "fetched remote content");
        if response.status == 200 {
            match serde_json::from_str::<JsonValue>(&response.body) {
                Ok(content) if !is_error_envelope(&content) && !is_blank(&content) => {
                    metadata.insert(CONTENT_KEY.to_string(), content);
                }
                Ok(_) => {}
                Err(err) => debug!(uri, error = %err, "remote content is not JSON"),
            }
        }
        storage.mark_included(processed_value);
        Ok(metadata)
    }
}

fn is_error_envelope(content: &JsonValue) -> bool {
    matches!(content, JsonValue::Object(map)
        if map.len() == 2 && map.contains_key("errors") && map.contains_key("resourceArgumentName"))
}
