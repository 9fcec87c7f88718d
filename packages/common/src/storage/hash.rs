use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::StorageError;

/// A validated SHA-256 content checksum.
///
/// Recorded on every stored blob for integrity checks and duplicate
/// detection by browsing tools. Blobs are addressed by [`super::BlobId`],
/// not by checksum.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Compute the SHA-256 checksum of the given data.
    pub fn compute(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Parse a 64-character hex-encoded checksum.
    pub fn from_hex(s: &str) -> Result<Self, StorageError> {
        let bytes =
            hex::decode(s).map_err(|e| StorageError::InvalidHash(format!("{s:?}: {e}")))?;
        let digest: [u8; 32] = bytes.try_into().map_err(|rest: Vec<u8>| {
            StorageError::InvalidHash(format!("expected 32 bytes, decoded {}", rest.len()))
        })?;
        Ok(Self(digest))
    }

    /// Return the checksum as a 64-character lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.to_hex())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
