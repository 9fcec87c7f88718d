use std::sync::Arc;

use common::{BlobId, BlobRecord, BlobStore, StorageError};
use tracing::{info, instrument};

use crate::error::AssetError;
use crate::metadata::{ModelMetadata, TextureMetadata};
use crate::path::texture_storage_key;
use crate::taxonomy::{PartType, TextureType, WeaponType};

use super::page::Page;
use super::{resolve_format, validate_name};

/// Filters for texture listings. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct TextureFilter {
    pub weapon_type: Option<WeaponType>,
    pub part_type: Option<PartType>,
    pub texture_type: Option<TextureType>,
    pub associated_model: Option<BlobId>,
}

impl TextureFilter {
    fn matches(&self, meta: &TextureMetadata) -> bool {
        if let Some(weapon) = self.weapon_type {
            if meta.weapon_type != Some(weapon) {
                return false;
            }
        }
        if let Some(part_type) = self.part_type {
            if meta.part_type != Some(part_type) {
                return false;
            }
        }
        if let Some(texture_type) = self.texture_type {
            if meta.texture_type != texture_type {
                return false;
            }
        }
        if let Some(model) = self.associated_model {
            if meta.associated_model != Some(model) {
                return false;
            }
        }
        true
    }
}

/// CRUD over texture blobs plus weapon/part/type filtering.
///
/// Holds a read handle on the model store so texture metadata that points
/// at a model can be checked against it at upload time.
#[derive(Clone)]
pub struct TextureService {
    store: Arc<dyn BlobStore<TextureMetadata>>,
    models: Arc<dyn BlobStore<ModelMetadata>>,
}

impl TextureService {
    pub fn new(
        store: Arc<dyn BlobStore<TextureMetadata>>,
        models: Arc<dyn BlobStore<ModelMetadata>>,
    ) -> Self {
        Self { store, models }
    }

    /// Store a texture blob plus its metadata document and return the record.
    ///
    /// Unlike models, textures with an extension outside the accepted table
    /// are rejected with [`AssetError::UnsupportedFormat`].
    #[instrument(skip(self, data, metadata_json))]
    pub async fn upload(
        &self,
        data: &[u8],
        filename: &str,
        metadata_json: &str,
    ) -> Result<BlobRecord<TextureMetadata>, AssetError> {
        let mut metadata: TextureMetadata = serde_json::from_str(metadata_json)
            .map_err(|e| AssetError::InvalidMetadata(e.to_string()))?;
        validate_name(&metadata.name)?;

        let format = resolve_format(metadata.format.as_deref(), filename).ok_or_else(|| {
            AssetError::InvalidMetadata(
                "format is missing and the filename has no extension".to_string(),
            )
        })?;
        let content_type = texture_content_type(&format).ok_or_else(|| {
            AssetError::UnsupportedFormat {
                extension: format.clone(),
            }
        })?;

        self.check_associated_model(&metadata).await?;

        metadata.format = Some(format.clone());
        let key = texture_storage_key(&metadata, &format);
        let id = self
            .store
            .put(data, filename, content_type, &key, metadata)
            .await?;
        let record = self.store.stat(id).await?;
        info!(texture = %id, key = %record.key, "stored texture");
        Ok(record)
    }

    /// Retrieve a texture's bytes and record by id.
    pub async fn get(
        &self,
        id: &str,
    ) -> Result<(Vec<u8>, BlobRecord<TextureMetadata>), AssetError> {
        let id = BlobId::parse(id)?;
        Ok(self.store.get(id).await?)
    }

    /// Retrieve the most recently uploaded texture with the exact filename.
    pub async fn get_by_filename(
        &self,
        filename: &str,
    ) -> Result<(Vec<u8>, BlobRecord<TextureMetadata>), AssetError> {
        Ok(self.store.get_by_filename(filename).await?)
    }

    /// Page through stored textures, oldest first.
    pub async fn list(
        &self,
        filter: &TextureFilter,
        skip: usize,
        limit: usize,
    ) -> Result<Page<BlobRecord<TextureMetadata>>, AssetError> {
        let records = self.store.list().await?;
        let matches: Vec<_> = records
            .into_iter()
            .filter(|r| filter.matches(&r.metadata))
            .collect();
        Ok(Page::from_matches(matches, skip, limit))
    }

    /// Delete a texture blob and its record.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), AssetError> {
        let id = BlobId::parse(id)?;
        self.store.delete(id).await?;
        info!(texture = %id, "deleted texture");
        Ok(())
    }

    /// Check that the metadata's associated model exists and that any weapon
    /// or part tags agree with it.
    async fn check_associated_model(&self, metadata: &TextureMetadata) -> Result<(), AssetError> {
        let Some(model_id) = metadata.associated_model else {
            return Ok(());
        };
        let model = match self.models.stat(model_id).await {
            Ok(record) => record,
            Err(StorageError::NotFound(_)) => {
                return Err(AssetError::InvalidMetadata(format!(
                    "associated model {model_id} does not exist"
                )));
            }
            Err(other) => return Err(other.into()),
        };

        let Some(part) = &model.metadata.weapon_part else {
            return Ok(());
        };
        if let Some(weapon) = metadata.weapon_type {
            if weapon != part.weapon_type {
                return Err(AssetError::InvalidMetadata(format!(
                    "weapon type {weapon} does not match associated model's {}",
                    part.weapon_type
                )));
            }
        }
        if let Some(part_type) = metadata.part_type {
            if part_type != part.part_type {
                return Err(AssetError::InvalidMetadata(format!(
                    "part type {part_type} does not match associated model's {}",
                    part.part_type
                )));
            }
        }
        Ok(())
    }
}

/// Accepted texture formats and the content type each is served with.
fn texture_content_type(format: &str) -> Option<&'static str> {
    match format {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "exr" | "tif" | "tiff" | "hdr" => Some("application/octet-stream"),
        _ => None,
    }
}
