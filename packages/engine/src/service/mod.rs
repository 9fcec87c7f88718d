//! Asset services: upload, retrieval, listing, and deletion of model and
//! texture blobs. Identifier strings and metadata JSON are parsed here, at
//! the boundary, so storage backends only ever see typed values.

mod page;

pub mod model;
pub mod texture;

pub use model::{ModelFilter, ModelService};
pub use page::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, Page};
pub use texture::{TextureFilter, TextureService};

use std::path::Path;

use crate::error::AssetError;
use crate::path::sanitize_name;

/// Lowercased extension of an upload filename, without the dot.
fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Resolve the stored format tag: the declared one, or the filename's
/// extension when the metadata leaves it out.
fn resolve_format(declared: Option<&str>, filename: &str) -> Option<String> {
    declared
        .map(|f| f.trim_start_matches('.').to_ascii_lowercase())
        .filter(|f| !f.is_empty())
        .or_else(|| file_extension(filename))
}

/// Reject names that are empty or sanitize to an empty key segment.
fn validate_name(name: &str) -> Result<(), AssetError> {
    if name.trim().is_empty() {
        return Err(AssetError::InvalidMetadata(
            "name must not be empty".to_string(),
        ));
    }
    if sanitize_name(name).is_empty() {
        return Err(AssetError::InvalidMetadata(format!(
            "name {name:?} contains no usable characters"
        )));
    }
    Ok(())
}
