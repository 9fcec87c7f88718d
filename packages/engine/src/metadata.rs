use std::collections::BTreeSet;

use common::BlobId;
use serde::{Deserialize, Serialize};

use crate::taxonomy::{PartType, TextureType, WeaponType};

/// Position, direction, or scale in model space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const ONE: Self = Self {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Pixel dimensions of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// A named point on a part where another part can connect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentPoint {
    pub name: String,
    pub position: Vec3,
}

/// Weapon-part fields of a model.
///
/// Present on a model if and only if it is a weapon part, so a part always
/// carries a weapon type and part type and a plain model never does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponPartMetadata {
    pub weapon_type: WeaponType,
    pub part_type: PartType,
    /// Variant name for alternate versions of the same part.
    #[serde(default)]
    pub variant: Option<String>,
    /// Named material slots, in authoring order.
    #[serde(default)]
    pub material_slots: Vec<String>,
    #[serde(default)]
    pub attachment_points: Vec<AttachmentPoint>,
}

/// Metadata document attached to a stored model blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// File format tag. Filled from the upload filename's extension when
    /// absent; stored records always carry it.
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    /// Free-form grouping segment for the storage key.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub weapon_part: Option<WeaponPartMetadata>,
}

impl ModelMetadata {
    pub fn is_weapon_part(&self) -> bool {
        self.weapon_part.is_some()
    }
}

/// Metadata document attached to a stored texture blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureMetadata {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// File format tag, same fill rule as models.
    #[serde(default)]
    pub format: Option<String>,
    pub texture_type: TextureType,
    /// Model this texture was authored for. Must reference a live model at
    /// upload time.
    #[serde(default)]
    pub associated_model: Option<BlobId>,
    #[serde(default)]
    pub weapon_type: Option<WeaponType>,
    #[serde(default)]
    pub part_type: Option<PartType>,
    #[serde(default)]
    pub resolution: Option<Resolution>,
    #[serde(default)]
    pub is_tiling: bool,
}
