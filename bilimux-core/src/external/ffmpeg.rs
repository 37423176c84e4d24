//! Transcoder invocation for merging and extracting segments.
//!
//! Everything runs in stream-copy mode: ffmpeg remuxes bytes that are
//! already encoded the way we want them, so invocations are I/O-bound
//! and never re-encode.

use crate::error::{CoreError, CoreResult};
use crate::external::check_dependency;
use crate::external::command::run_with_timeout;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

/// Longest stderr excerpt attached to a transcode failure.
const STDERR_EXCERPT_LIMIT: usize = 500;

/// Produces final artifacts from repaired segments.
///
/// Both operations overwrite an existing destination file. The trait
/// exists so the orchestrator can be exercised without the real binary;
/// see the `test-mocks` feature.
pub trait Transcoder {
    /// Confirms the backing tool can be invoked at all. A failure here
    /// is fatal for the whole run.
    fn ensure_available(&self) -> CoreResult<()> {
        Ok(())
    }

    /// Muxes a video segment and an audio segment into `output`.
    fn merge(&self, video: &Path, audio: &Path, output: &Path) -> CoreResult<()>;

    /// Rewraps a single segment into `output`.
    fn extract(&self, input: &Path, output: &Path) -> CoreResult<()>;
}

/// [`Transcoder`] backed by the ffmpeg binary.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    timeout: Duration,
}

impl FfmpegTranscoder {
    /// Creates a transcoder whose invocations are bounded by `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn run(&self, cmd: Command, output: &Path) -> CoreResult<()> {
        let result = run_with_timeout(cmd, self.timeout)
            .map_err(|e| CoreError::TranscodeFailure(format!("{e} (writing '{}')", output.display())))?;

        if !result.success() {
            return Err(CoreError::TranscodeFailure(format!(
                "ffmpeg exited with {} writing '{}': {}",
                result.status,
                output.display(),
                result.stderr_excerpt(STDERR_EXCERPT_LIMIT)
            )));
        }

        log::debug!(
            "ffmpeg finished writing {} in {:.1}s",
            output.display(),
            result.elapsed.as_secs_f64()
        );
        Ok(())
    }
}

impl Transcoder for FfmpegTranscoder {
    fn ensure_available(&self) -> CoreResult<()> {
        check_dependency("ffmpeg")
    }

    fn merge(&self, video: &Path, audio: &Path, output: &Path) -> CoreResult<()> {
        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-i")
            .arg(video)
            .arg("-i")
            .arg(audio)
            .args(["-c", "copy", "-y"])
            .arg(output);
        self.run(cmd, output)
    }

    fn extract(&self, input: &Path, output: &Path) -> CoreResult<()> {
        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-i")
            .arg(input)
            .args(["-c", "copy", "-y"])
            .arg(output);
        self.run(cmd, output)
    }
}
