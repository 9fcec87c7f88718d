use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;

use super::error::StorageError;
use super::hash::ContentHash;
use super::id::BlobId;
use super::record::BlobRecord;
use super::traits::BlobStore;

/// Filesystem-backed blob store.
///
/// Bytes and metadata documents live in parallel sharded layouts under one
/// root:
///
/// ```text
/// {base_path}/blobs/{first 2 hex chars of id}/{remaining 30 hex chars}
/// {base_path}/meta/{first 2 hex chars of id}/{remaining 30 hex chars}.json
/// ```
///
/// Both files are written via a temp file plus rename, so a successful `put`
/// is durable and a failed one leaves nothing retrievable behind.
pub struct FilesystemBlobStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemBlobStore {
    /// Create a new filesystem blob store rooted at `base_path`.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(base_path.join("blobs")).await?;
        fs::create_dir_all(base_path.join("meta")).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    /// Filesystem path for a blob's bytes.
    fn blob_path(&self, id: BlobId) -> PathBuf {
        self.base_path
            .join("blobs")
            .join(id.shard_prefix())
            .join(id.shard_suffix())
    }

    /// Filesystem path for a blob's metadata document.
    fn meta_path(&self, id: BlobId) -> PathBuf {
        self.base_path
            .join("meta")
            .join(id.shard_prefix())
            .join(format!("{}.json", id.shard_suffix()))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    /// Write `data` to `path` via a temp file and rename.
    async fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), StorageError> {
        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn read_record<M: DeserializeOwned>(
        &self,
        id: BlobId,
    ) -> Result<BlobRecord<M>, StorageError> {
        match fs::read(self.meta_path(id)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read every metadata document under `meta/`, in directory order.
    async fn read_all_records<M: DeserializeOwned>(
        &self,
    ) -> Result<Vec<BlobRecord<M>>, StorageError> {
        let mut records = Vec::new();
        let mut shards = fs::read_dir(self.base_path.join("meta")).await?;
        while let Some(shard) = shards.next_entry().await? {
            if !shard.file_type().await?.is_dir() {
                continue;
            }
            let mut entries = fs::read_dir(shard.path()).await?;
            while let Some(entry) = entries.next_entry().await? {
                let bytes = fs::read(entry.path()).await?;
                records.push(serde_json::from_slice(&bytes)?);
            }
        }
        Ok(records)
    }

    /// Read a blob's bytes for an already-loaded record.
    ///
    /// A record whose bytes are missing is corrupt, never merely absent.
    async fn read_bytes(&self, id: BlobId) -> Result<Vec<u8>, StorageError> {
        match fs::read(self.blob_path(id)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::Corrupt(format!(
                "record {id} exists but its data file is missing"
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl<M> BlobStore<M> for FilesystemBlobStore
where
    M: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn put(
        &self,
        data: &[u8],
        filename: &str,
        content_type: &str,
        key: &str,
        metadata: M,
    ) -> Result<BlobId, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

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
        let document = serde_json::to_vec(&record)?;

        self.write_atomic(&self.blob_path(id), data).await?;

        // The blob is only retrievable once its record lands; back out the
        // bytes if the record write fails.
        if let Err(e) = self.write_atomic(&self.meta_path(id), &document).await {
            let _ = fs::remove_file(self.blob_path(id)).await;
            return Err(e);
        }

        Ok(id)
    }

    async fn get(&self, id: BlobId) -> Result<(Vec<u8>, BlobRecord<M>), StorageError> {
        let record = self.read_record(id).await?;
        let bytes = self.read_bytes(id).await?;
        Ok((bytes, record))
    }

    async fn stat(&self, id: BlobId) -> Result<BlobRecord<M>, StorageError> {
        self.read_record(id).await
    }

    async fn get_by_filename(
        &self,
        filename: &str,
    ) -> Result<(Vec<u8>, BlobRecord<M>), StorageError> {
        let records = self.read_all_records::<M>().await?;
        let latest = records
            .into_iter()
            .filter(|r| r.filename == filename)
            .max_by_key(|r| (r.uploaded_at, r.id))
            .ok_or_else(|| StorageError::NotFound(filename.to_string()))?;

        let bytes = self.read_bytes(latest.id).await?;
        Ok((bytes, latest))
    }

    async fn list(&self) -> Result<Vec<BlobRecord<M>>, StorageError> {
        let mut records = self.read_all_records::<M>().await?;
        records.sort_by_key(|r| (r.uploaded_at, r.id));
        Ok(records)
    }

    async fn delete(&self, id: BlobId) -> Result<(), StorageError> {
        // Remove the record first so a concurrent read cannot observe a
        // record without bytes.
        match fs::remove_file(self.meta_path(id)).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        match fs::remove_file(self.blob_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
