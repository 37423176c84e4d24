//! Configuration structures and constants for a bilimux processing run.
//!
//! Instances of [`CoreConfig`] are created by consumers of the library
//! (like bilimux-cli) and passed to [`crate::process_items`]. The config
//! is immutable for the duration of a run.

use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;
use std::time::Duration;

/// File name of the per-item metadata document.
pub const METADATA_FILENAME: &str = "videoInfo.json";

/// Extension carried by processable segment files.
pub const SEGMENT_EXTENSION: &str = "m4s";

/// Default directory name (under the base directory) for merged video output.
pub const DEFAULT_VIDEO_OUTPUT_DIRNAME: &str = "bili_video_output";

/// Default directory name (under the base directory) for extracted audio output.
pub const DEFAULT_AUDIO_OUTPUT_DIRNAME: &str = "bili_audio_output";

/// Upper bound for a single prober invocation.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound for a single transcoder invocation.
pub const DEFAULT_TRANSCODE_TIMEOUT: Duration = Duration::from_secs(300);

/// Which final artifacts a run should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSelection {
    /// Merged video containers only.
    Video,
    /// Extracted audio files only.
    Audio,
    /// Both merged video containers and extracted audio files.
    VideoAndAudio,
}

impl OutputSelection {
    /// Whether merged video containers should be produced.
    #[must_use]
    pub fn video(self) -> bool {
        matches!(self, Self::Video | Self::VideoAndAudio)
    }

    /// Whether extracted audio files should be produced.
    #[must_use]
    pub fn audio(self) -> bool {
        matches!(self, Self::Audio | Self::VideoAndAudio)
    }
}

/// Core configuration for one processing pass over a download directory.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory holding the numeric item subdirectories.
    pub base_dir: PathBuf,

    /// Destination root for merged video containers.
    pub video_dir: PathBuf,

    /// Destination root for extracted audio files.
    pub audio_dir: PathBuf,

    /// Artifacts the run should produce.
    pub outputs: OutputSelection,

    /// Timeout applied to each prober invocation.
    pub probe_timeout: Duration,

    /// Timeout applied to each transcoder invocation.
    pub transcode_timeout: Duration,
}

impl CoreConfig {
    /// Creates a configuration with the default output roots under `base_dir`.
    #[must_use]
    pub fn new(base_dir: PathBuf) -> Self {
        let video_dir = base_dir.join(DEFAULT_VIDEO_OUTPUT_DIRNAME);
        let audio_dir = base_dir.join(DEFAULT_AUDIO_OUTPUT_DIRNAME);
        Self {
            base_dir,
            video_dir,
            audio_dir,
            outputs: OutputSelection::Video,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            transcode_timeout: DEFAULT_TRANSCODE_TIMEOUT,
        }
    }

    /// Validates that the base directory exists and is a directory.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.base_dir.is_dir() {
            return Err(CoreError::PathError(format!(
                "Base directory '{}' does not exist or is not a directory",
                self.base_dir.display()
            )));
        }
        Ok(())
    }
}
