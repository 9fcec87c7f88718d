//! Storage key generation.
//!
//! Pure functions from metadata to a hierarchical key. Identical metadata
//! always yields an identical key; nothing here consults a clock, the
//! filesystem, or any store. Keys are advisory labels for browsing and
//! export; blobs remain addressed by id.

use crate::metadata::{ModelMetadata, TextureMetadata};

/// Sanitize a name for use as a storage key segment.
///
/// Lowercases, replaces anything outside `[a-z0-9_-]` with `_`, collapses
/// runs of `_`, and strips `_` from both ends.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;
    for c in name.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            out.push(c);
            prev_underscore = false;
        } else if !prev_underscore {
            out.push('_');
            prev_underscore = true;
        }
    }
    out.trim_matches('_').to_string()
}

/// Sanitized segment, or `fallback` when the value is absent or sanitizes
/// to nothing.
fn segment_or(value: Option<&str>, fallback: &str) -> String {
    value
        .map(sanitize_name)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Storage key for a model blob.
///
/// Weapon parts land under their weapon and part type with a variant
/// subdirectory; everything else is grouped by category:
///
/// ```text
/// models/{category|weapons}/{weapon_type}/{part_type}/{base|variants/<variant>}/{name}.{format}
/// models/{category|misc}/{name}.{format}
/// ```
pub fn model_storage_key(meta: &ModelMetadata, format: &str) -> String {
    let name = sanitize_name(&meta.name);
    let format = format.to_ascii_lowercase();

    match &meta.weapon_part {
        Some(part) => {
            let category = segment_or(meta.category.as_deref(), "weapons");
            let placement = match part
                .variant
                .as_deref()
                .map(sanitize_name)
                .filter(|v| !v.is_empty())
            {
                Some(variant) => format!("variants/{variant}"),
                None => "base".to_string(),
            };
            format!(
                "models/{category}/{}/{}/{placement}/{name}.{format}",
                part.weapon_type, part.part_type
            )
        }
        None => {
            let category = segment_or(meta.category.as_deref(), "misc");
            format!("models/{category}/{name}.{format}")
        }
    }
}

/// Storage key for a texture blob.
///
/// Textures tagged with a weapon and part sit next to the parts they dress;
/// the rest are filed as shared materials, grouped under their associated
/// model's short id when one is given:
///
/// ```text
/// textures/{weapon_type}/{part_type}/{texture_type}/{name}.{format}
/// textures/materials/{texture_type}/{model short id}/{name}.{format}
/// textures/materials/{texture_type}/{name}.{format}
/// ```
pub fn texture_storage_key(meta: &TextureMetadata, format: &str) -> String {
    let name = sanitize_name(&meta.name);
    let format = format.to_ascii_lowercase();

    match (meta.weapon_type, meta.part_type) {
        (Some(weapon), Some(part)) => {
            format!(
                "textures/{weapon}/{part}/{}/{name}.{format}",
                meta.texture_type
            )
        }
        _ => match meta.associated_model {
            Some(model) => format!(
                "textures/materials/{}/{}/{name}.{format}",
                meta.texture_type,
                model.short()
            ),
            None => format!("textures/materials/{}/{name}.{format}", meta.texture_type),
        },
    }
}
