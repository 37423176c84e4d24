//! Core library for repairing and reassembling downloaded media segments
//! using ffmpeg and ffprobe.
//!
//! This crate provides item discovery, sentinel-prefix repair, media
//! classification, and reassembly of segment pairs into video containers
//! or stand-alone audio files.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use bilimux_core::{process_items, CoreConfig, OutputSelection};
//! use bilimux_core::external::{FfmpegTranscoder, FfprobeProber};
//! use std::path::PathBuf;
//!
//! let mut config = CoreConfig::new(PathBuf::from("/path/to/downloads"));
//! config.outputs = OutputSelection::VideoAndAudio;
//! config.validate().unwrap();
//!
//! let prober = FfprobeProber::new(config.probe_timeout);
//! let transcoder = FfmpegTranscoder::new(config.transcode_timeout);
//!
//! let report = process_items(&prober, &transcoder, &config).unwrap();
//! println!("{} artifact(s), {} failure(s)", report.artifacts.len(), report.failures.len());
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod metadata;
pub mod outpath;
pub mod processing;
pub mod repair;
pub mod sanitize;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, OutputSelection};
pub use discovery::{find_item_dirs, find_segments};
pub use error::{CoreError, CoreResult};
pub use metadata::{load_metadata, ItemMetadata};
pub use outpath::resolve_output_path;
pub use processing::{process_items, Item, Segment};
pub use repair::{repair_segment, repair_segment_to, RepairOutcome};
pub use sanitize::sanitize_name;
pub use utils::{format_bytes, format_duration};

use std::path::PathBuf;

/// Kind of final artifact produced for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Merged audio+video container.
    VideoContainer,
    /// Stand-alone extracted audio file.
    AudioFile,
}

/// One file produced by a run.
///
/// Collected in the [`RunReport`] so callers can print what was made
/// and how large it came out.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// Title of the item the artifact belongs to.
    pub title: String,
    pub path: PathBuf,
    pub size: u64,
}

/// A failure recorded against one item directory.
#[derive(Debug)]
pub struct ItemFailure {
    /// The item directory the failure belongs to.
    pub dir: PathBuf,
    pub error: CoreError,
}

/// Everything a processing pass produced and everything that went wrong.
///
/// Per-item failures land here instead of aborting the run; the caller
/// decides how loudly to report them.
#[derive(Debug, Default)]
pub struct RunReport {
    pub artifacts: Vec<Artifact>,
    pub failures: Vec<ItemFailure>,
}
