//! Discovery of item directories and their segment files.
//!
//! The downloader lays items out as all-digit subdirectories of a base
//! directory, each holding a metadata document and the item's segment
//! files. Discovery only looks at the top level of each directory; it
//! never recurses.

use crate::config::{METADATA_FILENAME, SEGMENT_EXTENSION};
use crate::error::{CoreError, CoreResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Finds the all-digit item subdirectories of `base_dir`.
///
/// Entries that are not directories, or whose names contain anything but
/// ASCII digits, are skipped with a debug log. The result is sorted in
/// numeric order so runs are deterministic regardless of readdir order.
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - The item directories, numerically sorted
/// * `Err(CoreError::NoItemsFound)` - If nothing qualified
/// * `Err(CoreError::Io)` - If the base directory could not be read
pub fn find_item_dirs(base_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let mut dirs: Vec<(String, PathBuf)> = Vec::new();

    for entry in fs::read_dir(base_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            log::debug!("Skipping non-directory entry: {}", path.display());
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) if is_item_dir_name(name) => {
                dirs.push((name.to_string(), path));
            }
            _ => {
                log::debug!("Skipping non-item directory: {}", path.display());
            }
        }
    }

    if dirs.is_empty() {
        return Err(CoreError::NoItemsFound);
    }

    // All-digit names sort numerically when ordered by length first.
    dirs.sort_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    Ok(dirs.into_iter().map(|(_, path)| path).collect())
}

/// True for names made of one or more ASCII digits.
fn is_item_dir_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

/// Finds the segment files directly inside `item_dir`, sorted by path.
///
/// Only regular files with the segment extension (case-insensitive)
/// qualify. An item directory without segments yields an empty vector;
/// that situation is judged later, when a merge actually needs input.
pub fn find_segments(item_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();

    for entry in fs::read_dir(item_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_segment = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SEGMENT_EXTENSION));
        if is_segment {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Path of the metadata document inside an item directory.
#[must_use]
pub fn metadata_path(item_dir: &Path) -> PathBuf {
    item_dir.join(METADATA_FILENAME)
}
