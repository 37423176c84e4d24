// bilimux-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// This module is only compiled when the "test-mocks" feature is enabled.
#![cfg(feature = "test-mocks")]

use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg::Transcoder;
use crate::external::ffprobe::{MediaInfo, MediaProber, StreamKind};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Builds a minimal [`MediaInfo`] for mock expectations.
#[must_use]
pub fn media_info(kind: StreamKind, codec: &str) -> MediaInfo {
    MediaInfo {
        kind,
        codec: codec.to_string(),
        duration: 213.4,
        bit_rate: 128_000,
        size: 1_024,
    }
}

/// Mock [`MediaProber`] answering from a canned table keyed by path.
///
/// Paths without an expectation produce a probe failure, which keeps
/// tests honest about which files they expect to be classified.
#[derive(Clone, Default)]
pub struct MockProber {
    results: Rc<RefCell<HashMap<PathBuf, Result<MediaInfo, String>>>>,
    probed: Rc<RefCell<Vec<PathBuf>>>,
}

impl MockProber {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a successful classification for `path`.
    pub fn expect(&self, path: &Path, info: MediaInfo) {
        self.results.borrow_mut().insert(path.to_path_buf(), Ok(info));
    }

    /// Registers a probe failure for `path`.
    pub fn expect_failure(&self, path: &Path, message: &str) {
        self.results
            .borrow_mut()
            .insert(path.to_path_buf(), Err(message.to_string()));
    }

    /// Paths probed so far, in call order.
    #[must_use]
    pub fn probed_paths(&self) -> Vec<PathBuf> {
        self.probed.borrow().clone()
    }
}

impl MediaProber for MockProber {
    fn probe(&self, path: &Path) -> CoreResult<MediaInfo> {
        self.probed.borrow_mut().push(path.to_path_buf());
        match self.results.borrow().get(path) {
            Some(Ok(info)) => Ok(info.clone()),
            Some(Err(message)) => Err(CoreError::ProbeFailure(message.clone())),
            None => Err(CoreError::ProbeFailure(format!(
                "MockProber: no expectation registered for '{}'",
                path.display()
            ))),
        }
    }
}

/// One recorded transcoder invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscodeCall {
    Merge {
        video: PathBuf,
        audio: PathBuf,
        output: PathBuf,
    },
    Extract {
        input: PathBuf,
        output: PathBuf,
    },
}

/// Mock [`Transcoder`] that records calls and fabricates output files.
///
/// Successful calls write `output_payload` to the destination so that
/// callers reading the artifact size back see a real file.
#[derive(Clone)]
pub struct MockTranscoder {
    calls: Rc<RefCell<Vec<TranscodeCall>>>,
    fail_outputs: Rc<RefCell<Vec<PathBuf>>>,
    output_payload: Rc<RefCell<Vec<u8>>>,
}

impl Default for MockTranscoder {
    fn default() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
            fail_outputs: Rc::new(RefCell::new(Vec::new())),
            output_payload: Rc::new(RefCell::new(b"muxed".to_vec())),
        }
    }
}

impl MockTranscoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call targeting `output` fail with a transcode error.
    pub fn fail_for(&self, output: &Path) {
        self.fail_outputs.borrow_mut().push(output.to_path_buf());
    }

    /// Overrides the bytes written to fabricated output files.
    pub fn set_output_payload(&self, payload: &[u8]) {
        *self.output_payload.borrow_mut() = payload.to_vec();
    }

    /// Calls recorded so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<TranscodeCall> {
        self.calls.borrow().clone()
    }

    fn complete(&self, output: &Path) -> CoreResult<()> {
        if self.fail_outputs.borrow().iter().any(|p| p == output) {
            return Err(CoreError::TranscodeFailure(format!(
                "MockTranscoder: simulated failure writing '{}'",
                output.display()
            )));
        }
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, &*self.output_payload.borrow())?;
        Ok(())
    }
}

impl Transcoder for MockTranscoder {
    fn merge(&self, video: &Path, audio: &Path, output: &Path) -> CoreResult<()> {
        self.calls.borrow_mut().push(TranscodeCall::Merge {
            video: video.to_path_buf(),
            audio: audio.to_path_buf(),
            output: output.to_path_buf(),
        });
        self.complete(output)
    }

    fn extract(&self, input: &Path, output: &Path) -> CoreResult<()> {
        self.calls.borrow_mut().push(TranscodeCall::Extract {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        });
        self.complete(output)
    }
}
