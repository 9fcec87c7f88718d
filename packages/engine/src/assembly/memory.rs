use async_trait::async_trait;
use chrono::Utc;
use common::StorageError;
use dashmap::DashMap;

use super::store::{AssemblyFilter, AssemblyStore, sort_most_recent_first};
use super::types::{Assembly, AssemblyId, AssemblyPart, AssemblyUpdate};

/// In-memory assembly store backed by a concurrent map.
///
/// Intended for tests and for embedding the engine without a data
/// directory. Contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryAssemblyStore {
    assemblies: DashMap<AssemblyId, Assembly>,
}

impl MemoryAssemblyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.assemblies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assemblies.is_empty()
    }
}

fn not_found(id: AssemblyId) -> StorageError {
    StorageError::NotFound(format!("assembly {id}"))
}

#[async_trait]
impl AssemblyStore for MemoryAssemblyStore {
    async fn create(&self, assembly: Assembly) -> Result<(), StorageError> {
        self.assemblies.insert(assembly.id, assembly);
        Ok(())
    }

    async fn get(&self, id: AssemblyId) -> Result<Assembly, StorageError> {
        self.assemblies
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| not_found(id))
    }

    async fn list(&self, filter: &AssemblyFilter) -> Result<Vec<Assembly>, StorageError> {
        let mut matches: Vec<Assembly> = self
            .assemblies
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        sort_most_recent_first(&mut matches);
        Ok(matches)
    }

    async fn update(
        &self,
        id: AssemblyId,
        update: AssemblyUpdate,
    ) -> Result<Assembly, StorageError> {
        let mut entry = self.assemblies.get_mut(&id).ok_or_else(|| not_found(id))?;
        let assembly = entry.value_mut();
        update.apply(assembly);
        assembly.updated_at = Utc::now();
        Ok(assembly.clone())
    }

    async fn replace_parts(
        &self,
        id: AssemblyId,
        parts: Vec<AssemblyPart>,
    ) -> Result<Assembly, StorageError> {
        let mut entry = self.assemblies.get_mut(&id).ok_or_else(|| not_found(id))?;
        let assembly = entry.value_mut();
        assembly.parts = parts;
        assembly.updated_at = Utc::now();
        Ok(assembly.clone())
    }

    async fn delete(&self, id: AssemblyId) -> Result<(), StorageError> {
        self.assemblies
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}
