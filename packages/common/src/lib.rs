pub mod config;
pub mod storage;

pub use config::{AppConfig, StorageConfig};
pub use storage::{BlobId, BlobRecord, BlobStore, ContentHash, StorageError};
