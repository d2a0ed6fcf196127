//! Blob data models.

/// Content type recorded for uploaded book text.
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

/// Properties recorded alongside a stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobProperties {
    pub content_length: u64,
    pub content_type: String,
}

impl BlobProperties {
    /// Creates properties for freshly written data.
    pub fn new(content_length: u64, content_type: impl Into<String>) -> Self {
        Self {
            content_length,
            content_type: content_type.into(),
        }
    }
}

/// Validates a blob key: a non-empty relative path without `..` segments.
pub fn is_valid_blob_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('/')
        && !key.contains('\\')
        && key.split('/').all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}
