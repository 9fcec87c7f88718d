pub mod assembly;
pub mod error;
pub mod metadata;
pub mod path;
pub mod service;
pub mod taxonomy;

use std::path::PathBuf;
use std::sync::Arc;

use common::storage::{FilesystemBlobStore, MemoryBlobStore};
use common::{AppConfig, BlobStore};

use crate::assembly::{
    AssemblyComposer, AssemblyStore, FilesystemAssemblyStore, MemoryAssemblyStore,
};
use crate::metadata::{ModelMetadata, TextureMetadata};
use crate::service::{ModelService, TextureService};

pub use error::AssetError;

/// The three asset services wired over one set of stores.
///
/// Cloning is cheap; clones share the underlying stores.
#[derive(Clone)]
pub struct AssetEngine {
    pub models: ModelService,
    pub textures: TextureService,
    pub assemblies: AssemblyComposer,
}

impl AssetEngine {
    /// Open filesystem-backed stores under the configured storage root.
    pub async fn open(config: &AppConfig) -> Result<Self, AssetError> {
        let root = PathBuf::from(&config.storage.root);
        let max_size = config.storage.max_blob_size;
        let models = Arc::new(FilesystemBlobStore::new(root.join("models"), max_size).await?);
        let textures = Arc::new(FilesystemBlobStore::new(root.join("textures"), max_size).await?);
        let assemblies = Arc::new(FilesystemAssemblyStore::new(root.join("assemblies")).await?);
        Ok(Self::from_parts(models, textures, assemblies))
    }

    /// Engine over in-memory stores. Contents are lost on drop.
    pub fn in_memory() -> Self {
        let models: Arc<MemoryBlobStore<ModelMetadata>> = Arc::new(MemoryBlobStore::new());
        let textures: Arc<MemoryBlobStore<TextureMetadata>> = Arc::new(MemoryBlobStore::new());
        Self::from_parts(models, textures, Arc::new(MemoryAssemblyStore::new()))
    }

    /// Wire the services over caller-provided stores.
    pub fn from_parts(
        models: Arc<dyn BlobStore<ModelMetadata>>,
        textures: Arc<dyn BlobStore<TextureMetadata>>,
        assemblies: Arc<dyn AssemblyStore>,
    ) -> Self {
        Self {
            models: ModelService::new(models.clone()),
            textures: TextureService::new(textures.clone(), models.clone()),
            assemblies: AssemblyComposer::new(assemblies, models, textures),
        }
    }
}
