//! Destination-path construction for merged and extracted artifacts.
//!
//! Outputs are organized by title: items whose group title matches their
//! own title (or is empty) land directly in the output root, everything
//! else is grouped into a per-group subdirectory.

use crate::error::{CoreError, CoreResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Builds the output path for an artifact and ensures its parent exists.
///
/// The file name is `{title}.{extension}`. When `group_title` is empty
/// or equal to `title` the file goes directly into `root`; otherwise it
/// goes into `root/{group_title}/`, created on demand. Both names must
/// already be sanitized - this function joins them as-is.
///
/// # Returns
///
/// * `Ok(PathBuf)` - The absolute artifact path, parent directory present
/// * `Err(CoreError::MissingTitle)` - If `title` is empty
/// * `Err(CoreError::PathError)` - If the parent directory could not be created
pub fn resolve_output_path(
    root: &Path,
    title: &str,
    group_title: &str,
    extension: &str,
) -> CoreResult<PathBuf> {
    if title.is_empty() {
        return Err(CoreError::MissingTitle(format!(
            "cannot name an output file under {}",
            root.display()
        )));
    }

    let filename = format!("{title}.{extension}");
    let path = if group_title.is_empty() || group_title == title {
        root.join(filename)
    } else {
        root.join(group_title).join(filename)
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CoreError::PathError(format!(
                "Failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    Ok(path)
}
