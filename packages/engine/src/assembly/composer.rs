use std::sync::Arc;

use chrono::Utc;
use common::{BlobId, BlobRecord, BlobStore, StorageError};
use futures::future;
use tracing::{info, instrument};

use crate::error::AssetError;
use crate::metadata::{ModelMetadata, TextureMetadata};
use crate::service::Page;
use crate::taxonomy::{WeaponType, is_valid_part_for_weapon};

use super::store::{AssemblyFilter, AssemblyStore};
use super::types::{
    Assembly, AssemblyId, AssemblyPart, AssemblyUpdate, ComposedAssembly, NewAssembly,
    PartResolution,
};

/// Builds, validates and resolves weapon assemblies.
///
/// Writes are strict: a part list only reaches the store once every part
/// fits the weapon archetype and every model, material slot and texture it
/// names exists. Reads are lenient: references that went dangling since
/// validation are reported per part, never repaired and never fatal.
#[derive(Clone)]
pub struct AssemblyComposer {
    store: Arc<dyn AssemblyStore>,
    models: Arc<dyn BlobStore<ModelMetadata>>,
    textures: Arc<dyn BlobStore<TextureMetadata>>,
}

impl AssemblyComposer {
    pub fn new(
        store: Arc<dyn AssemblyStore>,
        models: Arc<dyn BlobStore<ModelMetadata>>,
        textures: Arc<dyn BlobStore<TextureMetadata>>,
    ) -> Self {
        Self {
            store,
            models,
            textures,
        }
    }

    /// Validate and persist a new assembly.
    #[instrument(skip(self, new))]
    pub async fn create(&self, new: NewAssembly) -> Result<Assembly, AssetError> {
        if new.name.trim().is_empty() {
            return Err(AssetError::InvalidMetadata(
                "assembly name must not be empty".to_string(),
            ));
        }
        self.validate_parts(new.weapon_type, &new.parts).await?;

        let now = Utc::now();
        let assembly = Assembly {
            id: AssemblyId::generate(),
            name: new.name,
            description: new.description,
            weapon_type: new.weapon_type,
            tags: new.tags,
            parts: new.parts,
            created_at: now,
            updated_at: now,
        };
        self.store.create(assembly.clone()).await?;
        info!(assembly = %assembly.id, name = %assembly.name, "created assembly");
        Ok(assembly)
    }

    /// Load an assembly and resolve each part against the asset stores.
    pub async fn get(&self, id: &str) -> Result<ComposedAssembly, AssetError> {
        let id = AssemblyId::parse(id)?;
        let assembly = self.store.get(id).await?;
        let resolutions = future::try_join_all(
            assembly.parts.iter().map(|part| self.resolve_part(part)),
        )
        .await?;
        Ok(ComposedAssembly {
            assembly,
            resolutions,
        })
    }

    /// Page through assemblies, most recently updated first.
    pub async fn list(
        &self,
        filter: &AssemblyFilter,
        skip: usize,
        limit: usize,
    ) -> Result<Page<Assembly>, AssetError> {
        let matches = self.store.list(filter).await?;
        Ok(Page::from_matches(matches, skip, limit))
    }

    /// Update an assembly's descriptive fields.
    ///
    /// The weapon type is fixed at creation and the part list has its own
    /// operation, so neither can change here.
    #[instrument(skip(self, update))]
    pub async fn update_details(
        &self,
        id: &str,
        update: AssemblyUpdate,
    ) -> Result<Assembly, AssetError> {
        let id = AssemblyId::parse(id)?;
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(AssetError::InvalidMetadata(
                    "assembly name must not be empty".to_string(),
                ));
            }
        }
        let updated = self.store.update(id, update).await?;
        info!(assembly = %id, "updated assembly details");
        Ok(updated)
    }

    /// Replace an assembly's part list after validating the new one whole.
    ///
    /// Validation runs against the assembly's own weapon type, so parts
    /// that were fine for one archetype cannot be smuggled onto another.
    #[instrument(skip(self, parts))]
    pub async fn update_parts(
        &self,
        id: &str,
        parts: Vec<AssemblyPart>,
    ) -> Result<Assembly, AssetError> {
        let id = AssemblyId::parse(id)?;
        let existing = self.store.get(id).await?;
        self.validate_parts(existing.weapon_type, &parts).await?;

        let updated = self.store.replace_parts(id, parts).await?;
        info!(assembly = %id, parts = updated.parts.len(), "replaced assembly parts");
        Ok(updated)
    }

    /// Copy an assembly under a new id and name.
    ///
    /// The part list is copied as stored, without revalidation: a source
    /// with dangling references duplicates to a copy with the same dangling
    /// references.
    #[instrument(skip(self, new_name))]
    pub async fn duplicate(
        &self,
        id: &str,
        new_name: Option<String>,
    ) -> Result<Assembly, AssetError> {
        let source_id = AssemblyId::parse(id)?;
        let source = self.store.get(source_id).await?;

        let name = new_name.unwrap_or_else(|| format!("{} (Copy)", source.name));
        let now = Utc::now();
        let copy = Assembly {
            id: AssemblyId::generate(),
            name,
            created_at: now,
            updated_at: now,
            ..source
        };
        self.store.create(copy.clone()).await?;
        info!(source = %source_id, copy = %copy.id, "duplicated assembly");
        Ok(copy)
    }

    /// Delete an assembly. Referenced models and textures are untouched.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), AssetError> {
        let id = AssemblyId::parse(id)?;
        self.store.delete(id).await?;
        info!(assembly = %id, "deleted assembly");
        Ok(())
    }

    /// Check a whole part list against the weapon archetype and the asset
    /// stores. On failure, reports the first offense in part-list order.
    async fn validate_parts(
        &self,
        weapon_type: WeaponType,
        parts: &[AssemblyPart],
    ) -> Result<(), AssetError> {
        for part in parts {
            if !is_valid_part_for_weapon(weapon_type, part.part_type) {
                return Err(AssetError::InvalidPartForWeapon {
                    weapon_type,
                    part_type: part.part_type,
                });
            }
        }

        // Stat all referenced models concurrently, then walk the results in
        // part order so the reported failure is deterministic.
        let stats =
            future::join_all(parts.iter().map(|part| self.models.stat(part.model_id))).await;
        let mut models = Vec::with_capacity(parts.len());
        for (part, result) in parts.iter().zip(stats) {
            match result {
                Ok(record) => models.push(record),
                Err(StorageError::NotFound(_)) => {
                    return Err(AssetError::UnknownModelReference(part.model_id));
                }
                Err(other) => return Err(other.into()),
            }
        }

        for (part, model) in parts.iter().zip(&models) {
            self.check_material_slots(part, model)?;
        }

        let texture_refs: Vec<BlobId> = parts
            .iter()
            .flat_map(|part| part.material_overrides.values().copied())
            .collect();
        let stats =
            future::join_all(texture_refs.iter().map(|&id| self.textures.stat(id))).await;
        for (&texture_id, result) in texture_refs.iter().zip(stats) {
            match result {
                Ok(_) => {}
                Err(StorageError::NotFound(_)) => {
                    return Err(AssetError::UnknownTextureReference(texture_id));
                }
                Err(other) => return Err(other.into()),
            }
        }

        Ok(())
    }

    /// Every overridden slot must be one the model declares. A model with
    /// no weapon part metadata declares no slots.
    fn check_material_slots(
        &self,
        part: &AssemblyPart,
        model: &BlobRecord<ModelMetadata>,
    ) -> Result<(), AssetError> {
        if part.material_overrides.is_empty() {
            return Ok(());
        }
        let declared: &[String] = model
            .metadata
            .weapon_part
            .as_ref()
            .map(|wp| wp.material_slots.as_slice())
            .unwrap_or(&[]);
        for slot in part.material_overrides.keys() {
            if !declared.contains(slot) {
                return Err(AssetError::UnknownMaterialSlot {
                    model: part.model_id,
                    slot: slot.clone(),
                });
            }
        }
        Ok(())
    }

    /// Resolve one part leniently: a missing model or texture becomes part
    /// of the result instead of an error. Backend failures still propagate.
    async fn resolve_part(&self, part: &AssemblyPart) -> Result<PartResolution, AssetError> {
        let model = match self.models.stat(part.model_id).await {
            Ok(record) => Some(record),
            Err(StorageError::NotFound(_)) => None,
            Err(other) => return Err(other.into()),
        };

        let mut missing_textures = Vec::new();
        for (slot, &texture_id) in &part.material_overrides {
            match self.textures.stat(texture_id).await {
                Ok(_) => {}
                Err(StorageError::NotFound(_)) => missing_textures.push(slot.clone()),
                Err(other) => return Err(other.into()),
            }
        }

        Ok(PartResolution {
            model,
            missing_textures,
        })
    }
}
