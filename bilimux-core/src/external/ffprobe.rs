//! Media classification through ffprobe.
//!
//! A repaired segment file does not advertise whether it holds the video
//! or the audio half of an item, so the prober asks ffprobe for stream
//! and format metadata and condenses the answer into [`MediaInfo`].
//! Results are never cached; every query runs the tool again.

use crate::error::{CoreError, CoreResult};
use crate::external::check_dependency;
use crate::external::command::run_with_timeout;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

/// Longest stderr excerpt attached to a probe failure.
const STDERR_EXCERPT_LIMIT: usize = 200;

/// Role the leading stream of a segment plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Video,
    Audio,
    /// Anything ffprobe reports that is neither video nor audio.
    Other,
}

/// Snapshot of one probed segment.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    /// Role of the first stream in the file.
    pub kind: StreamKind,
    /// Codec name as reported by ffprobe (for example "h264" or "aac").
    pub codec: String,
    /// Container duration in seconds.
    pub duration: f64,
    /// Container bit rate in bits per second.
    pub bit_rate: u64,
    /// Total size in bytes.
    pub size: u64,
}

/// Queries classification metadata for segment files.
///
/// The trait exists so the orchestrator can be exercised without the
/// real binary; see the `test-mocks` feature.
pub trait MediaProber {
    /// Confirms the backing tool can be invoked at all. A failure here
    /// is fatal for the whole run, unlike per-file probe failures.
    fn ensure_available(&self) -> CoreResult<()> {
        Ok(())
    }

    /// Classifies the file at `path`.
    ///
    /// A failure only disqualifies this one file; callers continue with
    /// the remaining segments.
    fn probe(&self, path: &Path) -> CoreResult<MediaInfo>;
}

/// [`MediaProber`] backed by the ffprobe binary.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    timeout: Duration,
}

impl FfprobeProber {
    /// Creates a prober whose invocations are bounded by `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl MediaProber for FfprobeProber {
    fn ensure_available(&self) -> CoreResult<()> {
        check_dependency("ffprobe")
    }

    fn probe(&self, path: &Path) -> CoreResult<MediaInfo> {
        let mut cmd = Command::new("ffprobe");
        cmd.args(["-v", "quiet", "-print_format", "json", "-show_streams", "-show_format"])
            .arg(path);

        let output = run_with_timeout(cmd, self.timeout)
            .map_err(|e| CoreError::ProbeFailure(format!("{e} (probing '{}')", path.display())))?;

        if !output.success() {
            return Err(CoreError::ProbeFailure(format!(
                "ffprobe exited with {} for '{}': {}",
                output.status,
                path.display(),
                output.stderr_excerpt(STDERR_EXCERPT_LIMIT)
            )));
        }

        parse_probe_output(&output.stdout, path)
    }
}

// serde view of the ffprobe JSON document, limited to the fields we read.

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    bit_rate: Option<String>,
    size: Option<String>,
}

/// Decodes one ffprobe JSON document into [`MediaInfo`].
///
/// Every field the classifier relies on must be present and well formed.
/// Anything less is reported as a probe failure so the caller skips the
/// segment instead of guessing at its role.
fn parse_probe_output(raw: &[u8], path: &Path) -> CoreResult<MediaInfo> {
    let doc: FfprobeOutput = serde_json::from_slice(raw).map_err(|e| {
        CoreError::ProbeFailure(format!(
            "Unparseable ffprobe output for '{}': {e}",
            path.display()
        ))
    })?;

    let missing = |field: &str| {
        CoreError::ProbeFailure(format!(
            "ffprobe output for '{}' is missing {field}",
            path.display()
        ))
    };

    let stream = doc.streams.first().ok_or_else(|| missing("any stream"))?;

    let kind = match stream.codec_type.as_deref() {
        Some("video") => StreamKind::Video,
        Some("audio") => StreamKind::Audio,
        Some(_) => StreamKind::Other,
        None => return Err(missing("streams[0].codec_type")),
    };

    let codec = stream
        .codec_name
        .clone()
        .ok_or_else(|| missing("streams[0].codec_name"))?;

    let format = doc.format.as_ref().ok_or_else(|| missing("the format section"))?;

    let duration = format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| missing("a usable format.duration"))?;

    let bit_rate = format
        .bit_rate
        .as_deref()
        .and_then(|b| b.parse::<u64>().ok())
        .ok_or_else(|| missing("a usable format.bit_rate"))?;

    let size = format
        .size
        .as_deref()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| missing("a usable format.size"))?;

    Ok(MediaInfo { kind, codec, duration, bit_rate, size })
}

/// Conventional file extension for an extracted audio stream.
///
/// AAC streams go into an `.m4a` container; any other codec name is
/// used as the extension directly.
#[must_use]
pub fn audio_extension(codec: &str) -> &str {
    if codec == "aac" { "m4a" } else { codec }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe_json(streams: &str, format: &str) -> Vec<u8> {
        format!(r#"{{"streams": {streams}, "format": {format}}}"#).into_bytes()
    }

    #[test]
    fn parses_an_audio_segment() {
        let raw = probe_json(
            r#"[{"codec_type": "audio", "codec_name": "aac", "channels": 2}]"#,
            r#"{"duration": "213.4", "bit_rate": "127999", "size": "3414710"}"#,
        );

        let info = parse_probe_output(&raw, Path::new("audio.m4s")).unwrap();

        assert_eq!(info.kind, StreamKind::Audio);
        assert_eq!(info.codec, "aac");
        assert!((info.duration - 213.4).abs() < f64::EPSILON);
        assert_eq!(info.bit_rate, 127_999);
        assert_eq!(info.size, 3_414_710);
    }

    #[test]
    fn parses_a_video_segment() {
        let raw = probe_json(
            r#"[{"codec_type": "video", "codec_name": "h264", "width": 1920}]"#,
            r#"{"duration": "213.4", "bit_rate": "1200000", "size": "32014710"}"#,
        );

        let info = parse_probe_output(&raw, Path::new("video.m4s")).unwrap();

        assert_eq!(info.kind, StreamKind::Video);
        assert_eq!(info.codec, "h264");
    }

    #[test]
    fn unknown_codec_type_maps_to_other() {
        let raw = probe_json(
            r#"[{"codec_type": "subtitle", "codec_name": "ass"}]"#,
            r#"{"duration": "1.0", "bit_rate": "1", "size": "1"}"#,
        );

        let info = parse_probe_output(&raw, Path::new("sub.m4s")).unwrap();

        assert_eq!(info.kind, StreamKind::Other);
    }

    #[test]
    fn empty_stream_list_is_a_probe_failure() {
        let raw = probe_json("[]", r#"{"duration": "1.0", "bit_rate": "1", "size": "1"}"#);

        let result = parse_probe_output(&raw, Path::new("x.m4s"));

        assert!(matches!(result, Err(CoreError::ProbeFailure(_))));
    }

    #[test]
    fn missing_format_fields_are_probe_failures() {
        let raw = probe_json(
            r#"[{"codec_type": "audio", "codec_name": "aac"}]"#,
            r#"{"duration": "10.0"}"#,
        );

        let result = parse_probe_output(&raw, Path::new("x.m4s"));

        assert!(matches!(result, Err(CoreError::ProbeFailure(_))));
    }

    #[test]
    fn negative_duration_is_rejected() {
        let raw = probe_json(
            r#"[{"codec_type": "audio", "codec_name": "aac"}]"#,
            r#"{"duration": "-3.0", "bit_rate": "1", "size": "1"}"#,
        );

        assert!(parse_probe_output(&raw, Path::new("x.m4s")).is_err());
    }

    #[test]
    fn garbage_output_is_a_probe_failure() {
        let result = parse_probe_output(b"not json at all", Path::new("x.m4s"));

        assert!(matches!(result, Err(CoreError::ProbeFailure(_))));
    }

    #[test]
    fn aac_audio_uses_the_m4a_extension() {
        assert_eq!(audio_extension("aac"), "m4a");
        assert_eq!(audio_extension("flac"), "flac");
        assert_eq!(audio_extension("opus"), "opus");
    }
}
