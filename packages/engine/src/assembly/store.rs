use async_trait::async_trait;
use common::StorageError;

use crate::taxonomy::WeaponType;

use super::types::{Assembly, AssemblyId, AssemblyPart, AssemblyUpdate};

/// Filters for assembly listings. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct AssemblyFilter {
    pub weapon_type: Option<WeaponType>,
    pub tag: Option<String>,
}

impl AssemblyFilter {
    pub(crate) fn matches(&self, assembly: &Assembly) -> bool {
        if let Some(weapon) = self.weapon_type {
            if assembly.weapon_type != weapon {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !assembly.tags.contains(tag) {
                return false;
            }
        }
        true
    }
}

/// Persistence for assembly documents.
///
/// Stores hold whole documents and know nothing about part validation; the
/// composer validates part lists before anything reaches a store.
#[async_trait]
pub trait AssemblyStore: Send + Sync {
    /// Persist a new assembly document.
    async fn create(&self, assembly: Assembly) -> Result<(), StorageError>;

    /// Load an assembly, failing with `NotFound` when absent.
    async fn get(&self, id: AssemblyId) -> Result<Assembly, StorageError>;

    /// All assemblies matching the filter, most recently updated first.
    async fn list(&self, filter: &AssemblyFilter) -> Result<Vec<Assembly>, StorageError>;

    /// Apply a partial update to the descriptive fields and bump
    /// `updated_at`.
    async fn update(
        &self,
        id: AssemblyId,
        update: AssemblyUpdate,
    ) -> Result<Assembly, StorageError>;

    /// Replace the whole part list and bump `updated_at`.
    async fn replace_parts(
        &self,
        id: AssemblyId,
        parts: Vec<AssemblyPart>,
    ) -> Result<Assembly, StorageError>;

    /// Delete an assembly, failing with `NotFound` when absent.
    async fn delete(&self, id: AssemblyId) -> Result<(), StorageError>;
}

pub(super) fn sort_most_recent_first(assemblies: &mut [Assembly]) {
    assemblies.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));
}
