use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::StorageError;

/// Store-generated identifier for a blob.
///
/// Backed by UUIDv7, so ids carry their creation time in the high bits and
/// sort roughly by insertion order. The id is the only stable address for a
/// blob; storage keys are advisory.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobId(Uuid);

impl BlobId {
    /// Mint a fresh id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse an id from its canonical string form.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| StorageError::InvalidIdentifier(format!("{s:?}: {e}")))
    }

    /// Return the wrapped UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Return the 32-character unhyphenated hex form.
    pub fn simple(&self) -> String {
        self.0.simple().to_string()
    }

    /// Return the first 2 hex characters (shard prefix for filesystem layout).
    pub fn shard_prefix(&self) -> String {
        self.simple()[..2].to_string()
    }

    /// Return the remaining 30 hex characters (filename within shard).
    pub fn shard_suffix(&self) -> String {
        self.simple()[2..].to_string()
    }

    /// Return the first 8 hex characters, used as a compact path segment.
    pub fn short(&self) -> String {
        self.simple()[..8].to_string()
    }
}

impl fmt::Debug for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobId({})", self.0)
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for BlobId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for BlobId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
