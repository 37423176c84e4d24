//! Interactions with the external ffprobe and ffmpeg tools.
//!
//! Submodules cover bounded command execution, media classification, and
//! transcoding. The trait seams ([`MediaProber`], [`Transcoder`]) follow
//! the dependency injection pattern so the orchestrator can be exercised
//! without the real binaries.

use crate::error::{CoreError, CoreResult};
use std::io;
use std::process::{Command, Stdio};

pub mod command;
pub mod ffmpeg;
pub mod ffprobe;
pub mod mocks;

pub use command::{run_with_timeout, CommandError, CommandOutput};
pub use ffmpeg::{FfmpegTranscoder, Transcoder};
pub use ffprobe::{audio_extension, FfprobeProber, MediaInfo, MediaProber, StreamKind};

/// Checks that a required external command exists and can be started.
///
/// Runs `<cmd_name> -version` with all output discarded. Any exit status
/// proves the binary is present; only a failure to start counts.
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    log::debug!("Checking for external command: {cmd_name}");

    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => Err(CoreError::CommandStart(cmd_name.to_string(), e)),
    }
}
