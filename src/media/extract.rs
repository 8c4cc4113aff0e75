use crate::cleanup::TempTracker;
use crate::error::{MediascribeError, Result};
use crate::media::MediaProcessor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name for the audio track pulled out of a video container.
pub const EXTRACTED_AUDIO_FILENAME: &str = "extracted-audio.mp3";

/// Pull the audio track out of a video file into a fresh temp directory.
/// The directory and the output file are registered with the tracker before
/// the processor runs, so a failed extraction cannot leak either of them.
pub async fn extract_audio_track(
    processor: &dyn MediaProcessor,
    video: &Path,
    tracker: &mut TempTracker,
) -> Result<PathBuf> {
    let dir = tracker.create_temp_dir("extracted-audio")?;
    let dest = dir.join(EXTRACTED_AUDIO_FILENAME);
    tracker.track(&dest);

    info!("Extracting audio track from {}", video.display());
    processor.extract_audio(video, &dest).await?;

    if !dest.exists() {
        return Err(MediascribeError::Extraction(format!(
            "No audio output was produced for {}",
            video.display()
        )));
    }

    debug!("Audio track extracted to {}", dest.display());
    Ok(dest)
}
