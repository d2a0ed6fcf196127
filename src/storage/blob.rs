//! Blob store for book content.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{ErrorCode, LibraryError, LibraryResult};
use crate::models::{is_valid_blob_key, BlobProperties};

/// Trait for key-addressed content storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Scheme used when reporting content locations (`mem`, `file`, ...).
    fn scheme(&self) -> &'static str;

    /// Stores `data` under `key`, replacing any previous value.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> LibraryResult<BlobProperties>;

    /// Reads the full value stored under `key`.
    async fn get(&self, key: &str) -> LibraryResult<Option<Bytes>>;

    /// Deletes the value under `key`. Returns whether anything was removed.
    async fn delete(&self, key: &str) -> LibraryResult<bool>;
}

fn check_key(key: &str) -> LibraryResult<()> {
    if is_valid_blob_key(key) {
        Ok(())
    } else {
        Err(LibraryError::with_message(
            ErrorCode::InvalidBlobKey,
            format!("Invalid blob key: {}", key),
        ))
    }
}

/// Number of shards for the in-memory store (must be power of 2).
const NUM_SHARDS: usize = 16;

/// Sharded in-memory implementation of the blob store.
pub struct MemoryBlobStore {
    shards: Vec<DashMap<Arc<str>, Bytes>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        let shards = (0..NUM_SHARDS).map(|_| DashMap::new()).collect();
        Self { shards }
    }

    #[inline]
    fn get_shard(&self, key: &str) -> &DashMap<Arc<str>, Bytes> {
        let hash = key
            .bytes()
            .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
        &self.shards[hash % NUM_SHARDS]
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn scheme(&self) -> &'static str {
        "mem"
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> LibraryResult<BlobProperties> {
        check_key(key)?;
        let properties = BlobProperties::new(data.len() as u64, content_type);
        self.get_shard(key).insert(Arc::from(key), data);
        Ok(properties)
    }

    async fn get(&self, key: &str) -> LibraryResult<Option<Bytes>> {
        check_key(key)?;
        Ok(self.get_shard(key).get(key).map(|b| b.value().clone()))
    }

    async fn delete(&self, key: &str) -> LibraryResult<bool> {
        check_key(key)?;
        Ok(self.get_shard(key).remove(key).is_some())
    }
}

/// File system implementation of the blob store.
///
/// Keys map to paths below `base_path`. Writes go to a temporary sibling file
/// first and are renamed into place, so readers never observe partial content.
pub struct FsBlobStore {
    base_path: PathBuf,
}

impl FsBlobStore {
    pub async fn new(base_path: PathBuf) -> LibraryResult<Self> {
        fs::create_dir_all(&base_path).await.map_err(|e| {
            LibraryError::with_message(
                ErrorCode::StorageFailure,
                format!("Failed to create content directory: {}", e),
            )
        })?;

        Ok(Self { base_path })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }
}

fn storage_failure(action: &str, e: std::io::Error) -> LibraryError {
    LibraryError::with_message(ErrorCode::StorageFailure, format!("Failed to {}: {}", action, e))
}

#[async_trait]
impl BlobStore for FsBlobStore {
    fn scheme(&self) -> &'static str {
        "file"
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> LibraryResult<BlobProperties> {
        check_key(key)?;
        let path = self.blob_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_failure("create content directory", e))?;
        }

        let temp_path = path.with_extension(format!("{}.part", uuid::Uuid::new_v4().simple()));
        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| storage_failure("create content file", e))?;
        file.write_all(&data)
            .await
            .map_err(|e| storage_failure("write content", e))?;
        file.sync_all()
            .await
            .map_err(|e| storage_failure("flush content", e))?;
        drop(file);
        fs::rename(&temp_path, &path)
            .await
            .map_err(|e| storage_failure("move content into place", e))?;

        Ok(BlobProperties::new(data.len() as u64, content_type))
    }

    async fn get(&self, key: &str) -> LibraryResult<Option<Bytes>> {
        check_key(key)?;
        match fs::read(self.blob_path(key)).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_failure("read content", e)),
        }
    }

    async fn delete(&self, key: &str) -> LibraryResult<bool> {
        check_key(key)?;
        match fs::remove_file(self.blob_path(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(storage_failure("delete content", e)),
        }
    }
}
