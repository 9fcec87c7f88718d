use common::{BlobId, StorageError};
use thiserror::Error;

use crate::taxonomy::{PartType, WeaponType};

/// Errors surfaced by the asset services and the assembly composer.
///
/// Every variant carries enough detail to tell failures apart; callers never
/// see a missing asset and a broken backend as the same condition.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Metadata failed to parse or failed a validation rule.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// An identifier string could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The addressed asset or assembly does not exist or was deleted.
    #[error("not found: {0}")]
    NotFound(String),

    /// The file extension is not accepted for this asset kind.
    #[error("unsupported format: {extension:?}")]
    UnsupportedFormat { extension: String },

    /// The part type cannot be mounted on the weapon archetype.
    #[error("part type {part_type} is not valid for weapon type {weapon_type}")]
    InvalidPartForWeapon {
        weapon_type: WeaponType,
        part_type: PartType,
    },

    /// An assembly part references a model that does not exist.
    #[error("unknown model reference: {0}")]
    UnknownModelReference(BlobId),

    /// A material override names a slot the model does not declare.
    #[error("model {model} has no material slot {slot:?}")]
    UnknownMaterialSlot { model: BlobId, slot: String },

    /// A material override references a texture that does not exist.
    #[error("unknown texture reference: {0}")]
    UnknownTextureReference(BlobId),

    /// The blob exceeds the configured size limit.
    #[error("blob exceeds size limit ({actual} > {limit} bytes)")]
    BlobTooLarge { actual: u64, limit: u64 },

    /// The storage backend failed. Never raised for a merely missing asset.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] StorageError),
}

impl From<StorageError> for AssetError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => AssetError::NotFound(what),
            StorageError::InvalidIdentifier(what) => AssetError::InvalidIdentifier(what),
            StorageError::SizeLimitExceeded { actual, limit } => {
                AssetError::BlobTooLarge { actual, limit }
            }
            other => AssetError::StorageUnavailable(other),
        }
    }
}
