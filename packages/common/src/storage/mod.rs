mod error;
mod hash;
mod id;
mod record;
mod traits;

pub mod filesystem;
pub mod memory;

pub use error::StorageError;
pub use filesystem::FilesystemBlobStore;
pub use hash::ContentHash;
pub use id::BlobId;
pub use memory::MemoryBlobStore;
pub use record::BlobRecord;
pub use traits::BlobStore;
