use std::sync::Arc;

use common::{BlobId, BlobRecord, BlobStore};
use tracing::{info, instrument};

use crate::error::AssetError;
use crate::metadata::ModelMetadata;
use crate::path::model_storage_key;
use crate::taxonomy::{PartType, WeaponType};

use super::page::Page;
use super::{resolve_format, validate_name};

/// Filters for model listings. Unset fields match everything; the weapon and
/// part filters only ever match weapon-part models.
#[derive(Debug, Clone, Default)]
pub struct ModelFilter {
    pub weapon_type: Option<WeaponType>,
    pub part_type: Option<PartType>,
    pub tag: Option<String>,
    pub category: Option<String>,
}

impl ModelFilter {
    fn matches(&self, meta: &ModelMetadata) -> bool {
        if let Some(weapon) = self.weapon_type {
            match &meta.weapon_part {
                Some(part) if part.weapon_type == weapon => {}
                _ => return false,
            }
        }
        if let Some(part_type) = self.part_type {
            match &meta.weapon_part {
                Some(part) if part.part_type == part_type => {}
                _ => return false,
            }
        }
        if let Some(tag) = &self.tag {
            if !meta.tags.contains(tag) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if meta.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }
        true
    }
}

/// CRUD over 3D-model blobs plus weapon-part semantics.
#[derive(Clone)]
pub struct ModelService {
    store: Arc<dyn BlobStore<ModelMetadata>>,
}

impl ModelService {
    pub fn new(store: Arc<dyn BlobStore<ModelMetadata>>) -> Self {
        Self { store }
    }

    /// Store a model blob plus its metadata document and return the record.
    ///
    /// The format tag is filled from the filename's extension when the
    /// metadata omits it; a model with neither is rejected. Unknown formats
    /// are accepted and stored as generic binary. Weapon/part compatibility
    /// is not checked here; assembly composition enforces it.
    #[instrument(skip(self, data, metadata_json))]
    pub async fn upload(
        &self,
        data: &[u8],
        filename: &str,
        metadata_json: &str,
    ) -> Result<BlobRecord<ModelMetadata>, AssetError> {
        let mut metadata: ModelMetadata = serde_json::from_str(metadata_json)
            .map_err(|e| AssetError::InvalidMetadata(e.to_string()))?;
        validate_name(&metadata.name)?;

        let format = resolve_format(metadata.format.as_deref(), filename).ok_or_else(|| {
            AssetError::InvalidMetadata(
                "format is missing and the filename has no extension".to_string(),
            )
        })?;
        let content_type = model_content_type(&format);
        metadata.format = Some(format.clone());

        let key = model_storage_key(&metadata, &format);
        let id = self
            .store
            .put(data, filename, content_type, &key, metadata)
            .await?;
        let record = self.store.stat(id).await?;
        info!(model = %id, key = %record.key, "stored model");
        Ok(record)
    }

    /// Retrieve a model's bytes and record by id.
    pub async fn get(
        &self,
        id: &str,
    ) -> Result<(Vec<u8>, BlobRecord<ModelMetadata>), AssetError> {
        let id = BlobId::parse(id)?;
        Ok(self.store.get(id).await?)
    }

    /// Retrieve the most recently uploaded model with the exact filename.
    pub async fn get_by_filename(
        &self,
        filename: &str,
    ) -> Result<(Vec<u8>, BlobRecord<ModelMetadata>), AssetError> {
        Ok(self.store.get_by_filename(filename).await?)
    }

    /// Page through stored models, oldest first.
    pub async fn list(
        &self,
        filter: &ModelFilter,
        skip: usize,
        limit: usize,
    ) -> Result<Page<BlobRecord<ModelMetadata>>, AssetError> {
        let records = self.store.list().await?;
        let matches: Vec<_> = records
            .into_iter()
            .filter(|r| filter.matches(&r.metadata))
            .collect();
        Ok(Page::from_matches(matches, skip, limit))
    }

    /// Weapon-part models for one weapon archetype, optionally narrowed to
    /// a part type.
    pub async fn list_parts_for_weapon(
        &self,
        weapon_type: WeaponType,
        part_type: Option<PartType>,
        skip: usize,
        limit: usize,
    ) -> Result<Page<BlobRecord<ModelMetadata>>, AssetError> {
        let filter = ModelFilter {
            weapon_type: Some(weapon_type),
            part_type,
            ..Default::default()
        };
        self.list(&filter, skip, limit).await
    }

    /// Delete a model blob and its record.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), AssetError> {
        let id = BlobId::parse(id)?;
        self.store.delete(id).await?;
        info!(model = %id, "deleted model");
        Ok(())
    }
}

// Models are never rejected by format; anything unrecognized is stored as
// generic binary.
fn model_content_type(format: &str) -> &'static str {
    match format {
        "usda" => "text/plain",
        _ => "application/octet-stream",
    }
}
