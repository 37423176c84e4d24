//! Per-item orchestration: repair, classify, and reassemble.
//!
//! Items are processed strictly one after another. Any failure is
//! recorded against its item in the run report and the run moves on;
//! only a missing external tool or an unusable base directory aborts
//! the whole pass.

use crate::config::CoreConfig;
use crate::discovery::{find_item_dirs, find_segments, metadata_path};
use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg::Transcoder;
use crate::external::ffprobe::{audio_extension, MediaInfo, MediaProber, StreamKind};
use crate::metadata::{load_metadata, ItemMetadata};
use crate::outpath::resolve_output_path;
use crate::repair::{repair_segment, RepairOutcome};
use crate::utils::format_bytes;
use crate::{Artifact, ArtifactKind, ItemFailure, RunReport};

use log::{debug, error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// One segment file inside an item.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Location of the segment file.
    pub path: PathBuf,
    /// Byte length on disk, refreshed after the repair pass.
    pub size: u64,
    /// Result of the repair pass, once it has run.
    pub repair: Option<RepairOutcome>,
}

impl Segment {
    fn new(path: PathBuf) -> Self {
        Self { path, size: 0, repair: None }
    }
}

/// One logical episode: its metadata plus the discovered segments.
#[derive(Debug)]
pub struct Item {
    /// Source directory (all-digit name) the item came from.
    pub dir: PathBuf,
    /// Sanitized output title.
    pub title: String,
    /// Sanitized group title; empty or equal to `title` means ungrouped.
    pub group_title: String,
    /// Segments in discovery order.
    pub segments: Vec<Segment>,
}

impl Item {
    /// Assembles the item for `dir` from its metadata document and
    /// segment listing.
    fn assemble(dir: &Path) -> CoreResult<Self> {
        let ItemMetadata { title, group_title } = load_metadata(&metadata_path(dir))?;
        let segments = find_segments(dir)?.into_iter().map(Segment::new).collect();
        Ok(Self {
            dir: dir.to_path_buf(),
            title,
            group_title,
            segments,
        })
    }
}

/// Processes every item directory under `config.base_dir`.
///
/// This is the main entry point of the library. For each item it runs
/// the repair pass over the segments, then produces the artifacts the
/// configuration asks for. The returned [`RunReport`] lists everything
/// that was produced and every failure recorded along the way.
///
/// # Arguments
///
/// * `prober` - Implementation used to classify segments
/// * `transcoder` - Implementation used to merge and extract
/// * `config` - The run configuration
///
/// # Returns
///
/// * `Ok(RunReport)` - The run finished; failures, if any, are inside
/// * `Err(CoreError)` - The run could not start at all
pub fn process_items<P: MediaProber, T: Transcoder>(
    prober: &P,
    transcoder: &T,
    config: &CoreConfig,
) -> CoreResult<RunReport> {
    config.validate()?;

    info!("Checking for required external commands...");
    transcoder.ensure_available()?;
    prober.ensure_available()?;

    if config.outputs.video() {
        ensure_output_root(&config.video_dir)?;
        info!("Video output: {}", config.video_dir.display());
    }
    if config.outputs.audio() {
        ensure_output_root(&config.audio_dir)?;
        info!("Audio output: {}", config.audio_dir.display());
    }

    let item_dirs = match find_item_dirs(&config.base_dir) {
        Ok(dirs) => dirs,
        Err(CoreError::NoItemsFound) => {
            warn!(
                "No numeric item directories found in {}",
                config.base_dir.display()
            );
            return Ok(RunReport::default());
        }
        Err(e) => return Err(e),
    };

    info!("Found {} items in {}", item_dirs.len(), config.base_dir.display());

    let mut report = RunReport::default();
    for dir in &item_dirs {
        info!("----------------------------------------");
        info!("Processing item: {}", dir.display());
        process_item(prober, transcoder, config, dir, &mut report);
    }

    Ok(report)
}

/// Runs the repair -> classify -> transcode sequence for one item
/// directory. Failures are recorded in the report; nothing propagates.
fn process_item<P: MediaProber, T: Transcoder>(
    prober: &P,
    transcoder: &T,
    config: &CoreConfig,
    dir: &Path,
    report: &mut RunReport,
) {
    let mut item = match Item::assemble(dir) {
        Ok(item) => item,
        Err(e) => {
            error!("Skipping {}: {}", dir.display(), e);
            report.failures.push(ItemFailure {
                dir: dir.to_path_buf(),
                error: e,
            });
            return;
        }
    };
    debug!(
        "Item '{}' in {}: {} segment(s)",
        item.title,
        dir.display(),
        item.segments.len()
    );

    repair_segments(&mut item, report);

    if config.outputs.video() {
        match merge_item(prober, transcoder, config, &item) {
            Ok(artifact) => {
                info!(
                    "Merged '{}' -> {} ({})",
                    item.title,
                    artifact.path.display(),
                    format_bytes(artifact.size)
                );
                report.artifacts.push(artifact);
            }
            Err(e) => {
                error!("Merge failed for {}: {}", dir.display(), e);
                report.failures.push(ItemFailure {
                    dir: dir.to_path_buf(),
                    error: e,
                });
            }
        }
    }

    if config.outputs.audio() {
        extract_audio(prober, transcoder, config, &item, report);
    }
}

/// Repairs every segment of the item in place.
///
/// A repair I/O failure is recorded but the segment stays in the item:
/// if the file really is unreadable the transcoder will fail on it with
/// more context later.
fn repair_segments(item: &mut Item, report: &mut RunReport) {
    for segment in &mut item.segments {
        match repair_segment(&segment.path) {
            Ok(outcome) => {
                segment.repair = Some(outcome);
                segment.size = fs::metadata(&segment.path).map(|m| m.len()).unwrap_or(0);
                match outcome {
                    RepairOutcome::Stripped => info!(
                        "Stripped sentinel prefix from {} ({})",
                        segment.path.display(),
                        format_bytes(segment.size)
                    ),
                    RepairOutcome::Unchanged => {
                        debug!("No sentinel prefix in {}", segment.path.display());
                    }
                    RepairOutcome::TooSmall => warn!(
                        "{} is shorter than the sentinel prefix; left as-is",
                        segment.path.display()
                    ),
                    RepairOutcome::WrongKind => warn!(
                        "{} does not look like a segment file; left as-is",
                        segment.path.display()
                    ),
                }
            }
            Err(e) => {
                warn!("Repair failed for {}: {}", segment.path.display(), e);
                report.failures.push(ItemFailure {
                    dir: item.dir.clone(),
                    error: e,
                });
            }
        }
    }
}

/// Produces the merged video container for one item.
fn merge_item<P: MediaProber, T: Transcoder>(
    prober: &P,
    transcoder: &T,
    config: &CoreConfig,
    item: &Item,
) -> CoreResult<Artifact> {
    if item.segments.len() < 2 {
        return Err(CoreError::InsufficientInput(format!(
            "{} has {} segment(s); a merge needs a video/audio pair",
            item.dir.display(),
            item.segments.len()
        )));
    }

    let (video, audio) = pair_segments(prober, &item.segments);
    debug!(
        "Merge pair for '{}': video={}, audio={}",
        item.title,
        video.display(),
        audio.display()
    );

    for path in [video, audio] {
        if !path.exists() {
            return Err(CoreError::InsufficientInput(format!(
                "segment '{}' disappeared before the merge",
                path.display()
            )));
        }
    }

    if item.title.is_empty() {
        return Err(CoreError::MissingTitle(format!("item {}", item.dir.display())));
    }

    let output = resolve_output_path(&config.video_dir, &item.title, &item.group_title, "mp4")?;
    transcoder.merge(video, audio, &output)?;

    let size = fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
    Ok(Artifact {
        kind: ArtifactKind::VideoContainer,
        title: item.title.clone(),
        path: output,
        size,
    })
}

/// Decides which segment carries the video and which the audio.
///
/// Discovery order is not trustworthy, so each candidate is classified
/// and the first segment of each role wins. When probing cannot name
/// both roles, the historical positional rule applies: first segment is
/// the video, second is the audio.
///
/// The caller guarantees at least two segments.
fn pair_segments<'a, P: MediaProber>(prober: &P, segments: &'a [Segment]) -> (&'a Path, &'a Path) {
    let mut video: Option<&Path> = None;
    let mut audio: Option<&Path> = None;

    for segment in segments {
        if video.is_some() && audio.is_some() {
            break;
        }
        match prober.probe(&segment.path) {
            Ok(info) => match info.kind {
                StreamKind::Video if video.is_none() => video = Some(&segment.path),
                StreamKind::Audio if audio.is_none() => audio = Some(&segment.path),
                kind => debug!(
                    "{}: {:?} stream not needed for pairing",
                    segment.path.display(),
                    kind
                ),
            },
            Err(e) => warn!("Classification failed for {}: {}", segment.path.display(), e),
        }
    }

    match (video, audio) {
        (Some(v), Some(a)) => (v, a),
        _ => {
            warn!("Could not classify a full video/audio pair; falling back to discovery order");
            (segments[0].path.as_path(), segments[1].path.as_path())
        }
    }
}

/// Saves every audio-role segment of the item as its own file.
///
/// A probe failure disqualifies only the affected segment; extraction
/// failures are likewise recorded per segment.
fn extract_audio<P: MediaProber, T: Transcoder>(
    prober: &P,
    transcoder: &T,
    config: &CoreConfig,
    item: &Item,
    report: &mut RunReport,
) {
    for segment in &item.segments {
        let info = match prober.probe(&segment.path) {
            Ok(info) => info,
            Err(e) => {
                warn!(
                    "Skipping {} for audio extraction: {}",
                    segment.path.display(),
                    e
                );
                report.failures.push(ItemFailure {
                    dir: item.dir.clone(),
                    error: e,
                });
                continue;
            }
        };

        if info.kind != StreamKind::Audio {
            debug!(
                "{} is not an audio segment ({:?}); skipping",
                segment.path.display(),
                info.kind
            );
            continue;
        }

        match save_audio_segment(transcoder, config, item, segment, &info) {
            Ok(artifact) => {
                info!(
                    "Extracted audio for '{}' -> {} ({})",
                    item.title,
                    artifact.path.display(),
                    format_bytes(artifact.size)
                );
                report.artifacts.push(artifact);
            }
            Err(e) => {
                error!(
                    "Audio extraction failed for {}: {}",
                    segment.path.display(),
                    e
                );
                report.failures.push(ItemFailure {
                    dir: item.dir.clone(),
                    error: e,
                });
            }
        }
    }
}

/// Rewraps one classified audio segment into the audio output tree.
/// The extension follows the codec ffprobe reported.
fn save_audio_segment<T: Transcoder>(
    transcoder: &T,
    config: &CoreConfig,
    item: &Item,
    segment: &Segment,
    info: &MediaInfo,
) -> CoreResult<Artifact> {
    if item.title.is_empty() {
        return Err(CoreError::MissingTitle(format!("item {}", item.dir.display())));
    }

    let extension = audio_extension(&info.codec);
    let output = resolve_output_path(&config.audio_dir, &item.title, &item.group_title, extension)?;
    transcoder.extract(&segment.path, &output)?;

    let size = fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
    Ok(Artifact {
        kind: ArtifactKind::AudioFile,
        title: item.title.clone(),
        path: output,
        size,
    })
}

fn ensure_output_root(dir: &Path) -> CoreResult<()> {
    fs::create_dir_all(dir).map_err(|e| {
        CoreError::PathError(format!(
            "Failed to create output directory '{}': {e}",
            dir.display()
        ))
    })
}
