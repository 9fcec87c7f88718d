use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::hash::ContentHash;
use super::id::BlobId;

/// Descriptor for a stored blob.
///
/// Written once at `put` time and never mutated afterwards; changes are
/// modeled as delete plus re-upload by the caller. `M` is the caller-defined
/// metadata document stored alongside the bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobRecord<M> {
    /// Store-generated identifier, the only stable address for the blob.
    pub id: BlobId,
    /// Original filename supplied at upload.
    pub filename: String,
    /// MIME content type supplied at upload.
    pub content_type: String,
    /// Size of the stored bytes.
    pub size_bytes: u64,
    /// SHA-256 checksum of the stored bytes.
    pub checksum: ContentHash,
    /// Hierarchical key describing where the blob logically lives, for
    /// browsing and export. Advisory only; blobs are addressed by `id`.
    pub key: String,
    /// When the blob was stored.
    pub uploaded_at: DateTime<Utc>,
    /// Caller-defined metadata document.
    pub metadata: M,
}
