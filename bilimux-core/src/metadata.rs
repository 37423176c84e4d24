//! Per-item metadata loading.
//!
//! Every item directory carries a `videoInfo.json` document written by
//! the downloader. Only the two title fields matter here; everything
//! else in the document is ignored.

use crate::error::{CoreError, CoreResult};
use crate::sanitize::sanitize_name;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The subset of the metadata document we read. Missing fields default
/// to empty strings rather than failing the whole item.
#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    title: String,
    #[serde(default, rename = "groupTitle")]
    group_title: String,
}

/// Title information for one item, already sanitized for filesystem use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMetadata {
    /// Display/output title of the item.
    pub title: String,
    /// Collection the item belongs to; equal to `title` or empty when
    /// the item stands alone.
    pub group_title: String,
}

/// Reads and sanitizes the metadata document at `path`.
///
/// # Returns
///
/// * `Ok(ItemMetadata)` - The sanitized titles
/// * `Err(CoreError::Metadata)` - If the document is unreadable or not valid JSON
pub fn load_metadata(path: &Path) -> CoreResult<ItemMetadata> {
    let data = fs::read_to_string(path).map_err(|e| {
        CoreError::Metadata(format!("Failed to read '{}': {e}", path.display()))
    })?;

    let raw: RawMetadata = serde_json::from_str(&data).map_err(|e| {
        CoreError::Metadata(format!("Failed to parse '{}': {e}", path.display()))
    })?;

    Ok(ItemMetadata {
        title: sanitize_name(&raw.title),
        group_title: sanitize_name(&raw.group_title),
    })
}
