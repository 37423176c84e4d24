// bilimux-cli/src/cli.rs
//
// Defines the command-line argument structure using clap.

use bilimux_core::OutputSelection;
use clap::Parser;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Bilimux: repair and remux downloaded media segments",
    long_about = "Strips the downloader's sentinel prefix from .m4s segment files, then \
                  merges each item's video/audio pair into an MP4 container and/or saves \
                  stand-alone audio files, using ffmpeg in stream-copy mode."
)]
pub struct Cli {
    /// Base directory holding the numeric download folders
    #[arg(value_name = "BASE_DIR", default_value = ".")]
    pub base_dir: PathBuf,

    /// Directory for merged video output (defaults to BASE_DIR/bili_video_output)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Also save stand-alone audio files alongside the merged video
    #[arg(long)]
    pub audio: bool,

    /// Save stand-alone audio files and skip the video merge
    #[arg(long)]
    pub audio_only: bool,

    /// Directory for audio output (defaults to BASE_DIR/bili_audio_output)
    #[arg(long, value_name = "AUDIO_DIR")]
    pub audio_dir: Option<PathBuf>,
}

impl Cli {
    /// Resolves the requested artifacts. `--audio-only` wins when both
    /// audio flags are given.
    #[must_use]
    pub fn output_selection(&self) -> OutputSelection {
        if self.audio_only {
            OutputSelection::Audio
        } else if self.audio {
            OutputSelection::VideoAndAudio
        } else {
            OutputSelection::Video
        }
    }
}
