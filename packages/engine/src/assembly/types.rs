use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use common::{BlobId, BlobRecord};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::AssetError;
use crate::metadata::{ModelMetadata, Vec3};
use crate::taxonomy::{PartType, WeaponType};

/// Identifier for a stored assembly.
///
/// Backed by UUIDv7 like [`BlobId`], but assemblies and blobs live in
/// separate namespaces and the types are kept distinct so one is never
/// passed where the other belongs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssemblyId(Uuid);

impl AssemblyId {
    /// Mint a fresh id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse an id from its canonical string form.
    pub fn parse(s: &str) -> Result<Self, AssetError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| AssetError::InvalidIdentifier(format!("{s:?}: {e}")))
    }

    /// Return the 32-character unhyphenated hex form.
    pub fn simple(&self) -> String {
        self.0.simple().to_string()
    }
}

impl fmt::Debug for AssemblyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssemblyId({})", self.0)
    }
}

impl fmt::Display for AssemblyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for AssemblyId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for AssemblyId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

/// One placed part within an assembly.
///
/// `material_overrides` maps a material slot name declared by the model to
/// the texture blob that fills it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyPart {
    pub model_id: BlobId,
    pub part_type: PartType,
    pub position: Vec3,
    pub rotation: Vec3,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
    #[serde(default)]
    pub material_overrides: BTreeMap<String, BlobId>,
}

/// A named weapon built from stored part models.
///
/// Parts are validated when the assembly is created or its part list is
/// replaced; afterwards they are plain references that may dangle if the
/// underlying assets are deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    pub id: AssemblyId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub weapon_type: WeaponType,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub parts: Vec<AssemblyPart>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating an assembly.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAssembly {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub weapon_type: WeaponType,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub parts: Vec<AssemblyPart>,
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (clear the field)
/// * JSON field = value => `Some(Some(v))` (set to value)
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Partial update of an assembly's descriptive fields.
///
/// The weapon type and the part list are deliberately absent: the weapon
/// type is fixed at creation, and parts are replaced wholesale through
/// their own operation so they always pass validation.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct AssemblyUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub tags: Option<BTreeSet<String>>,
}

impl AssemblyUpdate {
    pub(crate) fn apply(self, assembly: &mut Assembly) {
        if let Some(name) = self.name {
            assembly.name = name;
        }
        if let Some(description) = self.description {
            assembly.description = description;
        }
        if let Some(tags) = self.tags {
            assembly.tags = tags;
        }
    }
}

/// How one part of a read assembly resolved against the asset stores.
///
/// `model` is `None` when the referenced model has been deleted since the
/// part list was validated. `missing_textures` lists the slot names whose
/// override points at a texture that no longer exists.
#[derive(Debug, Clone, Serialize)]
pub struct PartResolution {
    pub model: Option<BlobRecord<ModelMetadata>>,
    pub missing_textures: Vec<String>,
}

impl PartResolution {
    pub fn is_resolved(&self) -> bool {
        self.model.is_some() && self.missing_textures.is_empty()
    }
}

/// An assembly together with per-part resolution state, index-aligned with
/// [`Assembly::parts`].
#[derive(Debug, Clone, Serialize)]
pub struct ComposedAssembly {
    pub assembly: Assembly,
    pub resolutions: Vec<PartResolution>,
}

impl ComposedAssembly {
    /// True when every part's model and every material override still exist.
    pub fn fully_resolved(&self) -> bool {
        self.resolutions.iter().all(PartResolution::is_resolved)
    }
}
