use crate::error::{MediascribeError, Result};
use crate::media::{MediaDescriptor, MediaType};
use std::path::Path;

/// Extensions the transcription API accepts directly as audio.
pub const AUDIO_EXTENSIONS: [&str; 7] = ["mp3", "wav", "m4a", "mpga", "mpeg", "mp4", "webm"];

/// Video containers we can pull an audio track out of.
pub const VIDEO_EXTENSIONS: [&str; 7] = ["mp4", "mov", "avi", "mkv", "webm", "flv", "wmv"];

/// Classify an input file by extension, case-insensitively. Containers that
/// appear in both sets (mp4, webm) classify as audio and skip extraction,
/// since the transcription API accepts them as-is.
pub fn classify(path: &Path) -> Result<MediaDescriptor> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let media_type = if AUDIO_EXTENSIONS.contains(&extension.as_str()) {
        MediaType::Audio
    } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        MediaType::Video
    } else {
        return Err(MediascribeError::UnsupportedFormat {
            extension,
            supported: supported_extensions().join(", "),
        });
    };

    Ok(MediaDescriptor {
        path: path.to_path_buf(),
        media_type,
        extension,
    })
}

/// Every accepted extension, audio first, without duplicates.
pub fn supported_extensions() -> Vec<&'static str> {
    let mut all = AUDIO_EXTENSIONS.to_vec();
    for ext in VIDEO_EXTENSIONS {
        if !all.contains(&ext) {
            all.push(ext);
        }
    }
    all
}
