use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediascribeError, Result};
use crate::media::MediaProcessor;

/// Media processor backed by the `ffmpeg` and `ffprobe` binaries on PATH.
pub struct FfmpegProcessor;

impl FfmpegProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Check that both binaries are installed and runnable. Called once
    /// before a run starts so a missing install fails fast.
    pub fn check_tools() -> Result<()> {
        Self::check_binary("ffmpeg")?;
        Self::check_binary("ffprobe")?;
        Ok(())
    }

    fn check_binary(name: &str) -> Result<()> {
        let output = std::process::Command::new(name)
            .arg("-version")
            .output()
            .map_err(|e| {
                MediascribeError::Config(format!(
                    "{name} not found. Please install FFmpeg and ensure it's in your PATH. Error: {e}"
                ))
            })?;

        if !output.status.success() {
            return Err(MediascribeError::Config(format!("{name} check failed")));
        }

        debug!("{} is available", name);
        Ok(())
    }
}

impl Default for FfmpegProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaProcessor for FfmpegProcessor {
    async fn probe_duration(&self, path: &Path) -> Result<f64> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| MediascribeError::Probe(format!("Failed to run FFprobe: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediascribeError::Probe(format!(
                "FFprobe failed for {}: {}",
                path.display(),
                stderr.trim()
            )));
        }

        let duration_str = String::from_utf8_lossy(&output.stdout);
        let duration_secs: f64 = duration_str.trim().parse().map_err(|_| {
            MediascribeError::Probe(format!(
                "No usable duration in {} (ffprobe said '{}')",
                path.display(),
                duration_str.trim()
            ))
        })?;

        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(MediascribeError::Probe(format!(
                "{} reports a duration of {}s; the file may be empty or corrupted",
                path.display(),
                duration_secs
            )));
        }

        debug!("{} is {:.3}s long", path.display(), duration_secs);
        Ok(duration_secs)
    }

    async fn extract_audio(&self, video: &Path, dest: &Path) -> Result<()> {
        debug!(
            "Extracting audio: {} -> {}",
            video.display(),
            dest.display()
        );

        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "error", "-y", "-i"])
            .arg(video)
            .args(["-vn", "-acodec", "libmp3lame"])
            .arg(dest)
            .output()
            .await
            .map_err(|e| MediascribeError::Extraction(format!("Failed to run FFmpeg: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediascribeError::Extraction(format!(
                "FFmpeg could not extract audio from {}: {}",
                video.display(),
                stderr.trim()
            )));
        }

        Ok(())
    }

    async fn cut_segment(
        &self,
        source: &Path,
        start_secs: f64,
        length_secs: f64,
        dest: &Path,
    ) -> Result<()> {
        let start = format!("{:.3}", start_secs);
        let length = format!("{:.3}", length_secs);

        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "error", "-y", "-ss"])
            .arg(&start)
            .arg("-i")
            .arg(source)
            .arg("-t")
            .arg(&length)
            .arg(dest)
            .output()
            .await
            .map_err(|e| MediascribeError::Cut(format!("Failed to run FFmpeg: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediascribeError::Cut(format!(
                "FFmpeg could not cut {}s starting at {}s from {}: {}",
                length,
                start,
                source.display(),
                stderr.trim()
            )));
        }

        Ok(())
    }
}
