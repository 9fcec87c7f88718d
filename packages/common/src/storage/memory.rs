use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use super::error::StorageError;
use super::hash::ContentHash;
use super::id::BlobId;
use super::record::BlobRecord;
use super::traits::BlobStore;

/// In-memory blob store.
///
/// Keeps bytes and records in a concurrent map with no durability and no
/// size limit. Intended for tests and for embedding the engine without a
/// data directory.
pub struct MemoryBlobStore<M> {
    blobs: DashMap<BlobId, (Vec<u8>, BlobRecord<M>)>,
}

impl<M> MemoryBlobStore<M> {
    pub fn new() -> Self {
        Self {
            blobs: DashMap::new(),
        }
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Total size of all stored bytes.
    pub fn total_bytes(&self) -> u64 {
        self.blobs.iter().map(|e| e.value().0.len() as u64).sum()
    }

    /// Drop every stored blob.
    pub fn clear(&self) {
        self.blobs.clear();
    }
}

impl<M> Default for MemoryBlobStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for MemoryBlobStore<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBlobStore")
            .field("blobs", &self.blobs.len())
            .finish()
    }
}

#[async_trait]
impl<M> BlobStore<M> for MemoryBlobStore<M>
where
    M: Clone + Send + Sync + 'static,
{
    async fn put(
        &self,
        data: &[u8],
        filename: &str,
        content_type: &str,
        key: &str,
        metadata: M,
    ) -> Result<BlobId, StorageError> {
        let id = BlobId::generate();
        let record = BlobRecord {
            id,
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            size_bytes: data.len() as u64,
            checksum: ContentHash::compute(data),
            key: key.to_string(),
            uploaded_at: Utc::now(),
            metadata,
        };
        self.blobs.insert(id, (data.to_vec(), record));
        Ok(id)
    }

    async fn get(&self, id: BlobId) -> Result<(Vec<u8>, BlobRecord<M>), StorageError> {
        self.blobs
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    async fn stat(&self, id: BlobId) -> Result<BlobRecord<M>, StorageError> {
        self.blobs
            .get(&id)
            .map(|entry| entry.value().1.clone())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    async fn get_by_filename(
        &self,
        filename: &str,
    ) -> Result<(Vec<u8>, BlobRecord<M>), StorageError> {
        self.blobs
            .iter()
            .filter(|entry| entry.value().1.filename == filename)
            .max_by_key(|entry| (entry.value().1.uploaded_at, entry.value().1.id))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StorageError::NotFound(filename.to_string()))
    }

    async fn list(&self) -> Result<Vec<BlobRecord<M>>, StorageError> {
        let mut records: Vec<BlobRecord<M>> = self
            .blobs
            .iter()
            .map(|entry| entry.value().1.clone())
            .collect();
        records.sort_by_key(|r| (r.uploaded_at, r.id));
        Ok(records)
    }

    async fn delete(&self, id: BlobId) -> Result<(), StorageError> {
        self.blobs
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}
