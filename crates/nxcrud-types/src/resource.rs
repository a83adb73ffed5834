use serde::{Deserialize, Serialize};

/// Reference to a persistent resource (an uploaded file, an image).
///
/// Resources are content-addressed by the SHA-1 of their data; the filename is
/// only used to build a friendly public URI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub sha1: String,
    pub filename: String,
}

impl ResourceRef {
    pub fn new(sha1: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            sha1: sha1.into(),
            filename: filename.into(),
        }
    }
}
