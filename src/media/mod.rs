use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub mod classify;
pub mod cut;
pub mod extract;
pub mod ffmpeg;
pub mod plan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Audio,
    Video,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Audio => write!(f, "audio"),
            MediaType::Video => write!(f, "video"),
        }
    }
}

/// A classified input file.
#[derive(Debug, Clone)]
pub struct MediaDescriptor {
    pub path: PathBuf,
    pub media_type: MediaType,
    pub extension: String,
}

/// External engine that does the actual codec work: probing duration,
/// demuxing audio out of a video container, and cutting time ranges.
#[async_trait]
pub trait MediaProcessor: Send + Sync {
    /// Total duration of a media file, in seconds.
    async fn probe_duration(&self, path: &Path) -> Result<f64>;

    /// Write the audio track of `video` to `dest` as a standalone audio file.
    async fn extract_audio(&self, video: &Path, dest: &Path) -> Result<()>;

    /// Write the range `[start, start + length)` of `source` to `dest`.
    async fn cut_segment(
        &self,
        source: &Path,
        start_secs: f64,
        length_secs: f64,
        dest: &Path,
    ) -> Result<()>;
}
