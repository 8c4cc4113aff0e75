use crate::cleanup::TempTracker;
use crate::config::DEFAULT_CHUNK_DURATION_SECS;
use crate::error::{MediascribeError, Result};
use crate::media::classify::classify;
use crate::media::cut::cut_segment;
use crate::media::extract::extract_audio_track;
use crate::media::plan::plan_segments;
use crate::media::{MediaDescriptor, MediaProcessor, MediaType};
use crate::transcribe::{TranscriptPart, Transcriber};
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Configuration for one transcription run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Target duration per chunk, in seconds. Must stay strictly below the
    /// transcriber's hard ceiling.
    pub max_chunk_duration_secs: f64,
    /// Show progress bars.
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_chunk_duration_secs: DEFAULT_CHUNK_DURATION_SECS,
            show_progress: true,
        }
    }
}

/// Statistics from a transcription run.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Total wall-clock time for the entire run.
    pub total_time: Duration,
    /// Time spent extracting the audio track (video inputs only).
    pub extraction_time: Option<Duration>,
    /// Time spent in transcription calls.
    pub transcription_time: Duration,
    /// Duration of the probed media.
    pub media_duration: Duration,
    /// Number of chunks planned and cut.
    pub chunks_total: usize,
    /// Number of chunks that transcribed successfully.
    pub chunks_transcribed: usize,
    /// Number of chunks whose transcription failed.
    pub chunks_failed: usize,
}

/// Result of a transcription run.
#[derive(Debug)]
pub struct PipelineResult {
    /// Path the transcript was written to.
    pub output_path: PathBuf,
    /// The joined transcript text.
    pub transcript: String,
    /// Per-chunk outcomes, in segment order.
    pub parts: Vec<TranscriptPart>,
    /// Run statistics.
    pub stats: PipelineStats,
}

/// Transcribe a long media file into a text transcript.
///
/// This is the main entry point. It:
/// 1. Classifies the input and extracts the audio track if it is video
/// 2. Probes the duration and plans duration-bounded segments
/// 3. Cuts each segment to its own chunk file, one at a time
/// 4. Transcribes each chunk in order, tolerating per-chunk failures
/// 5. Joins the successful parts and writes the output file
///
/// Temporary files are removed before this returns, on success and on
/// failure alike.
pub async fn transcribe_media(
    input: &Path,
    output: &Path,
    processor: &dyn MediaProcessor,
    transcriber: &dyn Transcriber,
    config: &PipelineConfig,
) -> Result<PipelineResult> {
    let start_time = Instant::now();

    let ceiling_secs = transcriber.max_chunk_duration().as_secs_f64();
    if !config.max_chunk_duration_secs.is_finite()
        || config.max_chunk_duration_secs <= 0.0
        || config.max_chunk_duration_secs >= ceiling_secs
    {
        return Err(MediascribeError::Config(format!(
            "Chunk duration {}s must be positive and stay below the {}s limit {} enforces",
            config.max_chunk_duration_secs,
            ceiling_secs,
            transcriber.name()
        )));
    }

    // Input pre-flight: must exist and be non-empty
    let input_meta = match tokio::fs::metadata(input).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MediascribeError::InputNotFound(input.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    if input_meta.len() == 0 {
        return Err(MediascribeError::EmptyInput(input.display().to_string()));
    }

    let descriptor = classify(input)?;
    info!(
        "Input {} is {} ({:.2} MB)",
        input.display(),
        descriptor.media_type,
        input_meta.len() as f64 / (1024.0 * 1024.0)
    );

    let mut tracker = TempTracker::new();
    let outcome = run_stages(
        &descriptor,
        output,
        processor,
        transcriber,
        config,
        &mut tracker,
    )
    .await;

    // Cleanup runs on every path out of the stages, success or failure.
    info!("Cleaning up {} temporary path(s)", tracker.len());
    tracker.cleanup_all();

    let mut result = outcome?;
    result.stats.total_time = start_time.elapsed();
    Ok(result)
}

async fn run_stages(
    descriptor: &MediaDescriptor,
    output: &Path,
    processor: &dyn MediaProcessor,
    transcriber: &dyn Transcriber,
    config: &PipelineConfig,
    tracker: &mut TempTracker,
) -> Result<PipelineResult> {
    let multi_progress = if config.show_progress {
        Some(MultiProgress::new())
    } else {
        None
    };

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 1: Audio Preparation
    // ═══════════════════════════════════════════════════════════════════════
    info!(
        "Stage 1/4: Preparing audio from {}",
        descriptor.path.display()
    );

    let (audio_path, extraction_time) = match descriptor.media_type {
        MediaType::Video => {
            let extraction_start = Instant::now();
            let pb = spinner(&multi_progress, "Extracting audio track...");

            let path = extract_audio_track(processor, &descriptor.path, tracker).await?;

            if let Some(pb) = pb {
                pb.finish_with_message("✓ Audio track extracted");
            }
            let elapsed = extraction_start.elapsed();
            info!("Audio extraction took {:.2}s", elapsed.as_secs_f64());
            (path, Some(elapsed))
        }
        MediaType::Audio => {
            debug!("Input is already audio; skipping extraction");
            (descriptor.path.clone(), None)
        }
    };

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 2: Probing and Cutting
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 2/4: Splitting audio into chunks");

    let duration_secs = processor.probe_duration(&audio_path).await?;
    // Hold every processor implementation to the probe contract
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(MediascribeError::Probe(format!(
            "{} reports a duration of {}s; the file may be empty or corrupted",
            audio_path.display(),
            duration_secs
        )));
    }
    info!("Media duration: {:.1}s", duration_secs);

    let plan = plan_segments(duration_secs, config.max_chunk_duration_secs);
    let chunk_dir = tracker.create_temp_dir("media-chunks")?;

    let cut_pb = progress_bar(&multi_progress, plan.len() as u64);
    let mut artifacts = Vec::with_capacity(plan.len());
    for segment in &plan {
        let artifact = cut_segment(processor, &audio_path, segment, &chunk_dir).await?;
        tracker.track(&artifact.path);
        if let Some(pb) = &cut_pb {
            pb.inc(1);
        }
        artifacts.push(artifact);
    }
    if let Some(pb) = cut_pb {
        pb.finish_with_message("Chunks ready");
    }
    info!("Created {} chunk(s)", artifacts.len());

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 3: Transcription
    // ═══════════════════════════════════════════════════════════════════════
    info!(
        "Stage 3/4: Transcribing {} chunk(s) with {}",
        artifacts.len(),
        transcriber.name()
    );
    let transcription_start = Instant::now();
    let transcribe_pb = progress_bar(&multi_progress, artifacts.len() as u64);

    let mut parts = Vec::with_capacity(artifacts.len());
    for artifact in &artifacts {
        info!(
            "Transcribing chunk {}/{} ({}, {:.2} MB)",
            artifact.segment_index + 1,
            artifacts.len(),
            artifact.file_name(),
            artifact.size_mb()
        );
        match transcriber.transcribe(artifact).await {
            Ok(text) => parts.push(TranscriptPart::success(artifact.segment_index, text)),
            Err(e) => {
                // Non-fatal: the remaining chunks still get their turn
                warn!(
                    "Chunk {}/{} failed: {}",
                    artifact.segment_index + 1,
                    artifacts.len(),
                    e
                );
                parts.push(TranscriptPart::failed(artifact.segment_index, e.to_string()));
            }
        }
        if let Some(pb) = &transcribe_pb {
            pb.inc(1);
        }
    }
    if let Some(pb) = transcribe_pb {
        pb.finish_with_message("Transcription complete");
    }
    let transcription_time = transcription_start.elapsed();

    let transcribed = parts.iter().filter(|p| p.is_success()).count();
    let failed = parts.len() - transcribed;
    info!(
        "Transcribed {}/{} chunk(s) in {:.2}s",
        transcribed,
        parts.len(),
        transcription_time.as_secs_f64()
    );

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 4: Join and Write
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 4/4: Writing transcript to {}", output.display());

    let transcript = join_parts(&parts);
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(output, &transcript).await?;
    info!("Wrote {} byte(s) to {}", transcript.len(), output.display());

    Ok(PipelineResult {
        output_path: output.to_path_buf(),
        transcript,
        parts,
        stats: PipelineStats {
            // Patched by the caller once cleanup has run
            total_time: Duration::ZERO,
            extraction_time,
            transcription_time,
            media_duration: Duration::from_secs_f64(duration_secs),
            chunks_total: artifacts.len(),
            chunks_transcribed: transcribed,
            chunks_failed: failed,
        },
    })
}

/// Join successful parts in segment order, one blank line between chunks.
/// Failed parts contribute nothing.
fn join_parts(parts: &[TranscriptPart]) -> String {
    parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// One-based ordinals of the failed chunks, matching the "chunk 2/3"
/// numbering in the progress logs (file names stay zero-based).
fn failed_chunk_ordinals(parts: &[TranscriptPart]) -> Vec<String> {
    parts
        .iter()
        .filter(|p| !p.is_success())
        .map(|p| (p.segment_index + 1).to_string())
        .collect()
}

fn spinner(multi_progress: &Option<MultiProgress>, message: &str) -> Option<ProgressBar> {
    multi_progress.as_ref().map(|mp| {
        let pb = mp.add(ProgressBar::new_spinner());
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    })
}

fn progress_bar(multi_progress: &Option<MultiProgress>, len: u64) -> Option<ProgressBar> {
    multi_progress.as_ref().map(|mp| {
        let pb = mp.add(ProgressBar::new(len));
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({eta})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    })
}

/// Print a summary of the run.
pub fn print_summary(result: &PipelineResult) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                     Transcription Complete                     ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Output:     {}", result.output_path.display());
    println!(
        "  Chunks:     {} transcribed, {} failed",
        result.stats.chunks_transcribed, result.stats.chunks_failed
    );
    println!(
        "  Duration:   {:.1}s of media",
        result.stats.media_duration.as_secs_f64()
    );
    println!();
    println!("  Timing:");
    if let Some(extraction) = result.stats.extraction_time {
        println!("    Extract:     {:.2}s", extraction.as_secs_f64());
    }
    println!(
        "    Transcribe:  {:.2}s ({} chunks)",
        result.stats.transcription_time.as_secs_f64(),
        result.stats.chunks_total
    );
    println!(
        "    Total:       {:.2}s",
        result.stats.total_time.as_secs_f64()
    );

    let failed = failed_chunk_ordinals(&result.parts);
    if !failed.is_empty() {
        println!();
        println!(
            "  {} Chunk(s) {} failed; their time ranges are missing from the transcript",
            style("Note:").yellow(),
            failed.join(", ")
        );
    }
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}
