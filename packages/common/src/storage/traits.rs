use async_trait::async_trait;

use super::error::StorageError;
use super::id::BlobId;
use super::record::BlobRecord;

/// Blob storage with a typed metadata document per blob.
///
/// Implementations persist the bytes together with a [`BlobRecord`]
/// describing them, addressed by a store-generated [`BlobId`]. A successful
/// `put` is durable before the id is returned.
#[async_trait]
pub trait BlobStore<M>: Send + Sync
where
    M: Send + Sync + 'static,
{
    /// Store bytes plus metadata and return the generated id.
    ///
    /// `key` is the advisory hierarchical key recorded on the blob; it does
    /// not affect how the blob is addressed.
    async fn put(
        &self,
        data: &[u8],
        filename: &str,
        content_type: &str,
        key: &str,
        metadata: M,
    ) -> Result<BlobId, StorageError>;

    /// Retrieve a blob's bytes and record by id.
    async fn get(&self, id: BlobId) -> Result<(Vec<u8>, BlobRecord<M>), StorageError>;

    /// Retrieve a blob's record alone, without reading the bytes.
    async fn stat(&self, id: BlobId) -> Result<BlobRecord<M>, StorageError>;

    /// Retrieve the most recently stored blob with the exact filename.
    ///
    /// Earlier blobs with the same filename stay reachable by id.
    async fn get_by_filename(
        &self,
        filename: &str,
    ) -> Result<(Vec<u8>, BlobRecord<M>), StorageError>;

    /// List every record, ordered by upload time then id, oldest first.
    async fn list(&self) -> Result<Vec<BlobRecord<M>>, StorageError>;

    /// Delete a blob and its record by id.
    ///
    /// Fails with [`StorageError::NotFound`] if the id is absent or was
    /// already deleted.
    async fn delete(&self, id: BlobId) -> Result<(), StorageError>;
}
