// bilimux-core/tests/process_items_tests.rs
//
// Exercises the full repair -> classify -> reassemble pipeline with the
// mock prober/transcoder from the "test-mocks" feature.

use bilimux_core::config::{CoreConfig, OutputSelection};
use bilimux_core::external::mocks::{media_info, MockProber, MockTranscoder, TranscodeCall};
use bilimux_core::external::StreamKind;
use bilimux_core::processing::process_items;
use bilimux_core::{ArtifactKind, CoreError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

// Nine ASCII '0' bytes followed by stand-in media content.
const PREFIXED_VIDEO: &[u8] = b"000000000video-bytes";
const PREFIXED_AUDIO: &[u8] = b"000000000audio-bytes";

/// Creates one item directory with a metadata document and segments.
/// Returns the item directory path.
fn make_item(base: &Path, id: &str, metadata_json: &str, segments: &[(&str, &[u8])]) -> PathBuf {
    let dir = base.join(id);
    fs::create_dir(&dir).expect("Failed to create item directory");
    fs::write(dir.join("videoInfo.json"), metadata_json).expect("Failed to write metadata");
    for (name, content) in segments {
        fs::write(dir.join(name), content).expect("Failed to write segment");
    }
    dir
}

fn video_config(base: &Path) -> CoreConfig {
    CoreConfig::new(base.to_path_buf())
}

#[test]
fn merges_a_pair_into_a_sanitized_container_name() -> Result<(), Box<dyn std::error::Error>> {
    let base = tempdir()?;
    let item = make_item(
        base.path(),
        "100",
        r#"{"title": "My:Video", "groupTitle": "My:Video"}"#,
        &[("1.m4s", PREFIXED_VIDEO), ("2.m4s", PREFIXED_AUDIO)],
    );

    let prober = MockProber::new();
    prober.expect(&item.join("1.m4s"), media_info(StreamKind::Video, "h264"));
    prober.expect(&item.join("2.m4s"), media_info(StreamKind::Audio, "aac"));

    let transcoder = MockTranscoder::new();
    transcoder.set_output_payload(b"fake mp4 payload");

    let report = process_items(&prober, &transcoder, &video_config(base.path()))?;

    assert!(report.failures.is_empty(), "unexpected failures: {:?}", report.failures);
    assert_eq!(report.artifacts.len(), 1);

    let artifact = &report.artifacts[0];
    let expected = base.path().join("bili_video_output").join("My_Video.mp4");
    assert_eq!(artifact.kind, ArtifactKind::VideoContainer);
    assert_eq!(artifact.title, "My_Video");
    assert_eq!(artifact.path, expected);
    assert_eq!(artifact.size, b"fake mp4 payload".len() as u64);
    assert!(expected.is_file());

    // The repair pass ran before the merge: both sources are stripped.
    assert_eq!(fs::read(item.join("1.m4s"))?, b"video-bytes");
    assert_eq!(fs::read(item.join("2.m4s"))?, b"audio-bytes");

    assert_eq!(
        transcoder.calls(),
        vec![TranscodeCall::Merge {
            video: item.join("1.m4s"),
            audio: item.join("2.m4s"),
            output: expected,
        }]
    );
    Ok(())
}

#[test]
fn pairing_follows_detected_roles_not_file_order() -> Result<(), Box<dyn std::error::Error>> {
    let base = tempdir()?;
    // Discovery order puts the audio half first.
    let item = make_item(
        base.path(),
        "200",
        r#"{"title": "Swapped", "groupTitle": "Swapped"}"#,
        &[("1.m4s", PREFIXED_AUDIO), ("2.m4s", PREFIXED_VIDEO)],
    );

    let prober = MockProber::new();
    prober.expect(&item.join("1.m4s"), media_info(StreamKind::Audio, "aac"));
    prober.expect(&item.join("2.m4s"), media_info(StreamKind::Video, "h264"));

    let transcoder = MockTranscoder::new();
    let report = process_items(&prober, &transcoder, &video_config(base.path()))?;

    assert!(report.failures.is_empty());
    assert!(matches!(
        transcoder.calls().as_slice(),
        [TranscodeCall::Merge { video, audio, .. }]
            if video == &item.join("2.m4s") && audio == &item.join("1.m4s")
    ));
    Ok(())
}

#[test]
fn pairing_falls_back_to_discovery_order_when_probing_fails()
-> Result<(), Box<dyn std::error::Error>> {
    let base = tempdir()?;
    let item = make_item(
        base.path(),
        "300",
        r#"{"title": "Fallback", "groupTitle": "Fallback"}"#,
        &[("1.m4s", PREFIXED_VIDEO), ("2.m4s", PREFIXED_AUDIO)],
    );

    let prober = MockProber::new();
    prober.expect_failure(&item.join("1.m4s"), "simulated probe breakage");
    prober.expect_failure(&item.join("2.m4s"), "simulated probe breakage");

    let transcoder = MockTranscoder::new();
    let report = process_items(&prober, &transcoder, &video_config(base.path()))?;

    // The merge still happens, positionally.
    assert_eq!(report.artifacts.len(), 1);
    assert!(matches!(
        transcoder.calls().as_slice(),
        [TranscodeCall::Merge { video, audio, .. }]
            if video == &item.join("1.m4s") && audio == &item.join("2.m4s")
    ));
    Ok(())
}

#[test]
fn a_transcode_failure_is_recorded_and_the_run_continues()
-> Result<(), Box<dyn std::error::Error>> {
    let base = tempdir()?;
    let first = make_item(
        base.path(),
        "1",
        r#"{"title": "Broken", "groupTitle": "Broken"}"#,
        &[("1.m4s", PREFIXED_VIDEO), ("2.m4s", PREFIXED_AUDIO)],
    );
    let second = make_item(
        base.path(),
        "2",
        r#"{"title": "Fine", "groupTitle": "Fine"}"#,
        &[("1.m4s", PREFIXED_VIDEO), ("2.m4s", PREFIXED_AUDIO)],
    );

    let prober = MockProber::new();
    for item in [&first, &second] {
        prober.expect(&item.join("1.m4s"), media_info(StreamKind::Video, "h264"));
        prober.expect(&item.join("2.m4s"), media_info(StreamKind::Audio, "aac"));
    }

    let transcoder = MockTranscoder::new();
    let broken_output = base.path().join("bili_video_output").join("Broken.mp4");
    transcoder.fail_for(&broken_output);

    let report = process_items(&prober, &transcoder, &video_config(base.path()))?;

    assert_eq!(report.artifacts.len(), 1);
    assert_eq!(report.artifacts[0].title, "Fine");

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].dir, first);
    assert!(matches!(report.failures[0].error, CoreError::TranscodeFailure(_)));

    // Both merges were attempted.
    assert_eq!(transcoder.calls().len(), 2);
    Ok(())
}

#[test]
fn too_few_segments_fail_without_touching_the_tools() -> Result<(), Box<dyn std::error::Error>> {
    let base = tempdir()?;
    let empty = make_item(base.path(), "1", r#"{"title": "Empty", "groupTitle": "Empty"}"#, &[]);
    let single = make_item(
        base.path(),
        "2",
        r#"{"title": "Single", "groupTitle": "Single"}"#,
        &[("only.m4s", PREFIXED_VIDEO)],
    );

    let prober = MockProber::new();
    let transcoder = MockTranscoder::new();
    let report = process_items(&prober, &transcoder, &video_config(base.path()))?;

    assert!(report.artifacts.is_empty());
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].dir, empty);
    assert_eq!(report.failures[1].dir, single);
    for failure in &report.failures {
        assert!(matches!(failure.error, CoreError::InsufficientInput(_)));
    }

    assert!(prober.probed_paths().is_empty());
    assert!(transcoder.calls().is_empty());
    Ok(())
}

#[test]
fn an_empty_title_blocks_the_merge() -> Result<(), Box<dyn std::error::Error>> {
    let base = tempdir()?;
    let item = make_item(
        base.path(),
        "400",
        r#"{"title": "", "groupTitle": ""}"#,
        &[("1.m4s", PREFIXED_VIDEO), ("2.m4s", PREFIXED_AUDIO)],
    );

    let prober = MockProber::new();
    prober.expect(&item.join("1.m4s"), media_info(StreamKind::Video, "h264"));
    prober.expect(&item.join("2.m4s"), media_info(StreamKind::Audio, "aac"));

    let transcoder = MockTranscoder::new();
    let report = process_items(&prober, &transcoder, &video_config(base.path()))?;

    assert!(report.artifacts.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0].error, CoreError::MissingTitle(_)));
    assert!(transcoder.calls().is_empty());
    Ok(())
}

#[test]
fn grouped_items_land_in_a_group_subdirectory() -> Result<(), Box<dyn std::error::Error>> {
    let base = tempdir()?;
    let item = make_item(
        base.path(),
        "500",
        r#"{"title": "Episode 2", "groupTitle": "Season One"}"#,
        &[("1.m4s", PREFIXED_VIDEO), ("2.m4s", PREFIXED_AUDIO)],
    );

    let prober = MockProber::new();
    prober.expect(&item.join("1.m4s"), media_info(StreamKind::Video, "h264"));
    prober.expect(&item.join("2.m4s"), media_info(StreamKind::Audio, "aac"));

    let transcoder = MockTranscoder::new();
    let report = process_items(&prober, &transcoder, &video_config(base.path()))?;

    let expected = base
        .path()
        .join("bili_video_output")
        .join("Season One")
        .join("Episode 2.mp4");
    assert_eq!(report.artifacts[0].path, expected);
    assert!(expected.is_file());
    Ok(())
}

#[test]
fn audio_only_extracts_each_audio_segment() -> Result<(), Box<dyn std::error::Error>> {
    let base = tempdir()?;
    let item = make_item(
        base.path(),
        "600",
        r#"{"title": "Podcast", "groupTitle": "Podcast"}"#,
        &[
            ("1.m4s", PREFIXED_VIDEO),
            ("2.m4s", PREFIXED_AUDIO),
            ("3.m4s", PREFIXED_AUDIO),
        ],
    );

    let prober = MockProber::new();
    prober.expect(&item.join("1.m4s"), media_info(StreamKind::Video, "h264"));
    prober.expect(&item.join("2.m4s"), media_info(StreamKind::Audio, "aac"));
    prober.expect_failure(&item.join("3.m4s"), "simulated probe breakage");

    let transcoder = MockTranscoder::new();
    let mut config = video_config(base.path());
    config.outputs = OutputSelection::Audio;

    let report = process_items(&prober, &transcoder, &config)?;

    // One audio artifact; the video segment is skipped silently and the
    // unprobeable one is recorded as a failure.
    let expected = base.path().join("bili_audio_output").join("Podcast.m4a");
    assert_eq!(report.artifacts.len(), 1);
    assert_eq!(report.artifacts[0].kind, ArtifactKind::AudioFile);
    assert_eq!(report.artifacts[0].path, expected);

    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0].error, CoreError::ProbeFailure(_)));

    assert_eq!(
        transcoder.calls(),
        vec![TranscodeCall::Extract {
            input: item.join("2.m4s"),
            output: expected,
        }]
    );
    Ok(())
}

#[test]
fn non_aac_audio_keeps_its_codec_extension() -> Result<(), Box<dyn std::error::Error>> {
    let base = tempdir()?;
    let item = make_item(
        base.path(),
        "700",
        r#"{"title": "Lossless", "groupTitle": "Lossless"}"#,
        &[("1.m4s", PREFIXED_AUDIO)],
    );

    let prober = MockProber::new();
    prober.expect(&item.join("1.m4s"), media_info(StreamKind::Audio, "flac"));

    let transcoder = MockTranscoder::new();
    let mut config = video_config(base.path());
    config.outputs = OutputSelection::Audio;

    let report = process_items(&prober, &transcoder, &config)?;

    assert_eq!(
        report.artifacts[0].path,
        base.path().join("bili_audio_output").join("Lossless.flac")
    );
    Ok(())
}

#[test]
fn video_and_audio_mode_produces_both_artifacts() -> Result<(), Box<dyn std::error::Error>> {
    let base = tempdir()?;
    let item = make_item(
        base.path(),
        "800",
        r#"{"title": "Both", "groupTitle": "Both"}"#,
        &[("1.m4s", PREFIXED_VIDEO), ("2.m4s", PREFIXED_AUDIO)],
    );

    let prober = MockProber::new();
    prober.expect(&item.join("1.m4s"), media_info(StreamKind::Video, "h264"));
    prober.expect(&item.join("2.m4s"), media_info(StreamKind::Audio, "aac"));

    let transcoder = MockTranscoder::new();
    let mut config = video_config(base.path());
    config.outputs = OutputSelection::VideoAndAudio;

    let report = process_items(&prober, &transcoder, &config)?;

    assert!(report.failures.is_empty());
    assert_eq!(report.artifacts.len(), 2);

    let kinds: Vec<_> = report.artifacts.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![ArtifactKind::VideoContainer, ArtifactKind::AudioFile]);

    let calls = transcoder.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0], TranscodeCall::Merge { .. }));
    assert!(matches!(calls[1], TranscodeCall::Extract { .. }));
    Ok(())
}

#[test]
fn a_missing_metadata_document_skips_only_that_item() -> Result<(), Box<dyn std::error::Error>> {
    let base = tempdir()?;

    // Item 1 has segments but no metadata document.
    let broken = base.path().join("1");
    fs::create_dir(&broken)?;
    fs::write(broken.join("1.m4s"), PREFIXED_VIDEO)?;
    fs::write(broken.join("2.m4s"), PREFIXED_AUDIO)?;

    let good = make_item(
        base.path(),
        "2",
        r#"{"title": "Good", "groupTitle": "Good"}"#,
        &[("1.m4s", PREFIXED_VIDEO), ("2.m4s", PREFIXED_AUDIO)],
    );

    let prober = MockProber::new();
    prober.expect(&good.join("1.m4s"), media_info(StreamKind::Video, "h264"));
    prober.expect(&good.join("2.m4s"), media_info(StreamKind::Audio, "aac"));

    let transcoder = MockTranscoder::new();
    let report = process_items(&prober, &transcoder, &video_config(base.path()))?;

    assert_eq!(report.artifacts.len(), 1);
    assert_eq!(report.artifacts[0].title, "Good");

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].dir, broken);
    assert!(matches!(report.failures[0].error, CoreError::Metadata(_)));
    Ok(())
}

#[test]
fn a_base_without_items_produces_an_empty_report() -> Result<(), Box<dyn std::error::Error>> {
    let base = tempdir()?;
    fs::create_dir(base.path().join("not-numeric"))?;

    let prober = MockProber::new();
    let transcoder = MockTranscoder::new();
    let report = process_items(&prober, &transcoder, &video_config(base.path()))?;

    assert!(report.artifacts.is_empty());
    assert!(report.failures.is_empty());
    assert!(transcoder.calls().is_empty());
    Ok(())
}

#[test]
fn a_missing_base_directory_is_fatal() {
    let prober = MockProber::new();
    let transcoder = MockTranscoder::new();
    let config = CoreConfig::new(PathBuf::from("/surely/does/not/exist"));

    let result = process_items(&prober, &transcoder, &config);

    assert!(matches!(result, Err(CoreError::PathError(_))));
}
