use thiserror::Error;

/// Errors that can occur during blob storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested object was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The provided identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The provided content hash is invalid.
    #[error("invalid content hash: {0}")]
    InvalidHash(String),

    /// The blob exceeds the configured size limit.
    #[error("blob exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },

    /// A record exists but its stored data is missing or unreadable.
    #[error("stored object is corrupt: {0}")]
    Corrupt(String),

    /// An I/O error occurred.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A metadata document failed to serialize or deserialize.
    #[error("metadata document error: {0}")]
    Serialization(#[from] serde_json::Error),
}
