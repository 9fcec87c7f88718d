use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use common::StorageError;
use tokio::fs;

use super::store::{AssemblyFilter, AssemblyStore, sort_most_recent_first};
use super::types::{Assembly, AssemblyId, AssemblyPart, AssemblyUpdate};

/// Filesystem-backed assembly store.
///
/// Each assembly is one JSON document at `{base_path}/{id}.json`. Assembly
/// counts stay small enough that a flat directory works; documents are
/// written via a temp file plus rename so readers never see a partial one.
pub struct FilesystemAssemblyStore {
    base_path: PathBuf,
}

impl FilesystemAssemblyStore {
    /// Create a new filesystem assembly store rooted at `base_path`.
    pub async fn new(base_path: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self { base_path })
    }

    fn document_path(&self, id: AssemblyId) -> PathBuf {
        self.base_path.join(format!("{}.json", id.simple()))
    }

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

        if let Err(e) = fs::rename(&temp_path, path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn write_document(&self, assembly: &Assembly) -> Result<(), StorageError> {
        let document = serde_json::to_vec(assembly)?;
        self.write_atomic(&self.document_path(assembly.id), &document)
            .await
    }

    async fn read_document(&self, id: AssemblyId) -> Result<Assembly, StorageError> {
        match fs::read(self.document_path(id)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(format!("assembly {id}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read every assembly document, in directory order.
    async fn read_all_documents(&self) -> Result<Vec<Assembly>, StorageError> {
        let mut assemblies = Vec::new();
        let mut entries = fs::read_dir(&self.base_path).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let bytes = fs::read(&path).await?;
            assemblies.push(serde_json::from_slice(&bytes)?);
        }
        Ok(assemblies)
    }
}

#[async_trait]
impl AssemblyStore for FilesystemAssemblyStore {
    async fn create(&self, assembly: Assembly) -> Result<(), StorageError> {
        self.write_document(&assembly).await
    }

    async fn get(&self, id: AssemblyId) -> Result<Assembly, StorageError> {
        self.read_document(id).await
    }

    async fn list(&self, filter: &AssemblyFilter) -> Result<Vec<Assembly>, StorageError> {
        let mut matches: Vec<Assembly> = self
            .read_all_documents()
            .await?
            .into_iter()
            .filter(|a| filter.matches(a))
            .collect();
        sort_most_recent_first(&mut matches);
        Ok(matches)
    }

    async fn update(
        &self,
        id: AssemblyId,
        update: AssemblyUpdate,
    ) -> Result<Assembly, StorageError> {
        let mut assembly = self.read_document(id).await?;
        update.apply(&mut assembly);
        assembly.updated_at = Utc::now();
        self.write_document(&assembly).await?;
        Ok(assembly)
    }

    async fn replace_parts(
        &self,
        id: AssemblyId,
        parts: Vec<AssemblyPart>,
    ) -> Result<Assembly, StorageError> {
        let mut assembly = self.read_document(id).await?;
        assembly.parts = parts;
        assembly.updated_at = Utc::now();
        self.write_document(&assembly).await?;
        Ok(assembly)
    }

    async fn delete(&self, id: AssemblyId) -> Result<(), StorageError> {
        match fs::remove_file(self.document_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(format!("assembly {id}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}
