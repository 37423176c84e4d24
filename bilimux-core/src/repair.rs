//! Sentinel-prefix repair for downloaded segment files.
//!
//! The download cache prepends nine ASCII '0' bytes to every segment it
//! writes, which makes the file unreadable as media data until the
//! marker is removed. This module detects and strips that marker, either
//! in place or into an alternate destination file.

use crate::config::SEGMENT_EXTENSION;
use crate::error::CoreResult;
use std::fs;
use std::path::Path;

/// Number of marker bytes prepended by the downloader.
pub const SENTINEL_LEN: usize = 9;

/// The marker consists of this byte repeated [`SENTINEL_LEN`] times.
pub const SENTINEL_BYTE: u8 = b'0';

/// What the repair pass did (or declined to do) with one file.
///
/// Only [`Stripped`](Self::Stripped) and [`Unchanged`](Self::Unchanged)
/// leave the file in a state worth handing to the transcoder; the other
/// two mean the file was skipped without being touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairOutcome {
    /// The sentinel prefix was present and has been removed.
    Stripped,
    /// No sentinel prefix was found; the content is already usable.
    Unchanged,
    /// The file is shorter than the sentinel, so there is nothing to judge.
    TooSmall,
    /// The file does not carry the processable segment extension.
    WrongKind,
}

impl RepairOutcome {
    /// Whether the file can be fed to downstream processing.
    #[must_use]
    pub fn is_usable(self) -> bool {
        matches!(self, Self::Stripped | Self::Unchanged)
    }
}

/// Repairs the segment file at `path` in place.
///
/// Shorthand for [`repair_segment_to`] with no alternate destination.
pub fn repair_segment(path: &Path) -> CoreResult<RepairOutcome> {
    repair_segment_to(path, None)
}

/// Strips the sentinel prefix from the file at `path` if it is present.
///
/// With `dest` set to `None` the repaired bytes overwrite the original
/// file; with a destination the original is left untouched and the
/// result lands there instead. A file without the marker is copied
/// verbatim to the destination, so the destination always holds the
/// usable form afterwards. [`TooSmall`](RepairOutcome::TooSmall) and
/// [`WrongKind`](RepairOutcome::WrongKind) never write anything.
///
/// Running the repair twice is harmless: once the marker is gone the
/// prefix no longer matches and the second pass reports `Unchanged`.
///
/// # Arguments
///
/// * `path` - The segment file to inspect
/// * `dest` - Optional alternate destination for the usable bytes
///
/// # Returns
///
/// * `Ok(RepairOutcome)` - What happened to the file
/// * `Err(CoreError::Io)` - If the file could not be read or written
pub fn repair_segment_to(path: &Path, dest: Option<&Path>) -> CoreResult<RepairOutcome> {
    let data = fs::read(path)?;

    if data.len() < SENTINEL_LEN {
        log::debug!(
            "{} is {} bytes, shorter than the sentinel; skipping",
            path.display(),
            data.len()
        );
        return Ok(RepairOutcome::TooSmall);
    }

    if !has_segment_extension(path) {
        log::debug!("{} is not a .{SEGMENT_EXTENSION} file; skipping", path.display());
        return Ok(RepairOutcome::WrongKind);
    }

    if data[..SENTINEL_LEN].iter().all(|&b| b == SENTINEL_BYTE) {
        let target = dest.unwrap_or(path);
        fs::write(target, &data[SENTINEL_LEN..])?;
        log::debug!(
            "Stripped sentinel prefix from {} ({} -> {} bytes)",
            path.display(),
            data.len(),
            data.len() - SENTINEL_LEN
        );
        return Ok(RepairOutcome::Stripped);
    }

    if let Some(dest) = dest {
        if dest != path {
            fs::write(dest, &data)?;
            log::debug!(
                "No sentinel prefix in {}; copied verbatim to {}",
                path.display(),
                dest.display()
            );
        }
    }
    Ok(RepairOutcome::Unchanged)
}

/// True when the path carries the processable segment extension
/// (case-insensitive).
fn has_segment_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SEGMENT_EXTENSION))
}
