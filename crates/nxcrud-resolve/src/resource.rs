use nxcrud_types::ResourceRef;
use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, ResolveResult};

/// Builds public URIs for persistent resources:
/// `{base_uri}/_Resources/Persistent/{sha1}/{filename}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentResourceLocator {
    /// Scheme and host (and optional path prefix). Empty for relative URIs.
    #[serde(default)]
    pub base_uri: String,
}

impl PersistentResourceLocator {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
        }
    }

    pub fn public_uri(&self, resource: &ResourceRef) -> ResolveResult<String> {
        let sha1 = resource.sha1.trim();
        if sha1.is_empty() {
            return Err(ResolveError::InvalidResource(
                "resource has no content hash".into(),
            ));
        }
        if !sha1.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ResolveError::InvalidResource(format!(
                "content hash is not hex: {sha1}"
            )));
        }
        let base = self.base_uri.trim_end_matches('/');
        let filename = resource.filename.trim_start_matches('/');
        if filename.is_empty() {
            Ok(format!("{base}/_Resources/Persistent/{sha1}"))
        } else {
            Ok(format!("{base}/_Resources/Persistent/{sha1}/{filename}"))
        }
    }
}
