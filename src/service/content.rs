//! Book content storage and paged retrieval.

use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{ErrorCode, LibraryError, LibraryResult};
use crate::models::{PagedContent, TEXT_CONTENT_TYPE};
use crate::storage::BlobStore;

use super::paginator::Paginator;

/// Prefix under which book texts are stored.
pub const CONTENT_PREFIX: &str = "bookcontents";

/// Stores book texts in a blob store and serves them page by page.
#[derive(Clone)]
pub struct ContentService {
    blobs: Arc<dyn BlobStore>,
    bucket: String,
    paginator: Paginator,
}

impl ContentService {
    pub fn new(blobs: Arc<dyn BlobStore>, bucket: impl Into<String>, default_page_size: usize) -> Self {
        Self {
            blobs,
            bucket: bucket.into(),
            paginator: Paginator::new(default_page_size),
        }
    }

    /// Blob key for a stored file name.
    pub fn content_key(file_name: &str) -> String {
        format!("{}/{}", CONTENT_PREFIX, file_name)
    }

    /// Stores `data` as the text of `file_name` and returns its location,
    /// e.g. `mem://diglib/AbC123.txt`.
    ///
    /// Text that is not valid UTF-8 is rejected before anything is written.
    pub async fn store_file(&self, file_name: &str, data: Bytes) -> LibraryResult<String> {
        if let Err(e) = std::str::from_utf8(&data) {
            return Err(LibraryError::with_message(
                ErrorCode::InvalidInput,
                format!("Book content must be UTF-8 text: {}", e),
            ));
        }
        let key = Self::content_key(file_name);
        let properties = self.blobs.put(&key, data, TEXT_CONTENT_TYPE).await?;
        debug!(key = %key, size = properties.content_length, "Stored book content");
        Ok(format!("{}://{}/{}", self.blobs.scheme(), self.bucket, file_name))
    }

    /// Reads the full text stored for `file_name`.
    pub async fn read_full_text(&self, file_name: Option<&str>) -> LibraryResult<String> {
        let file_name = file_name.ok_or_else(|| LibraryError::new(ErrorCode::InvalidFileReference))?;
        let key = Self::content_key(file_name);

        let data = self.blobs.get(&key).await?.ok_or_else(|| {
            warn!(key = %key, "Book content is missing from the blob store");
            LibraryError::with_message(
                ErrorCode::ContentMissing,
                format!("Content file {} not found", file_name),
            )
        })?;

        String::from_utf8(data.to_vec()).map_err(|e| {
            LibraryError::with_message(
                ErrorCode::StorageFailure,
                format!("Content file {} is not valid UTF-8: {}", file_name, e),
            )
        })
    }

    /// Fetches the text for `file_name` and returns the requested page.
    ///
    /// The blob is read afresh on every call. `page_size` falls back to the
    /// configured default when absent.
    pub async fn read_book_content(
        &self,
        file_name: Option<&str>,
        page_number: i64,
        page_size: Option<usize>,
    ) -> LibraryResult<PagedContent> {
        let text = self.read_full_text(file_name).await?;
        self.paginator.paginate(&text, page_number, page_size)
    }

    /// Removes the text stored for `file_name`. Returns whether anything was removed.
    pub async fn delete_book_content(&self, file_name: Option<&str>) -> LibraryResult<bool> {
        let file_name = file_name.ok_or_else(|| LibraryError::new(ErrorCode::InvalidFileReference))?;
        self.blobs.delete(&Self::content_key(file_name)).await
    }
}
