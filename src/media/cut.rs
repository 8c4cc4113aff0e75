use crate::error::{MediascribeError, Result};
use crate::media::plan::SegmentDescriptor;
use crate::media::MediaProcessor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Chunks are always re-encoded to MP3, whatever the source container.
pub const CHUNK_EXTENSION: &str = "mp3";

/// One cut chunk on disk, ready for transcription.
#[derive(Debug, Clone)]
pub struct ChunkArtifact {
    pub segment_index: usize,
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl ChunkArtifact {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Materialize one planned segment as `chunk-<index>.mp3` inside
/// `chunk_dir`. The name is derived from the segment index alone, so a
/// chunk is always traceable back to its time range.
pub async fn cut_segment(
    processor: &dyn MediaProcessor,
    source: &Path,
    segment: &SegmentDescriptor,
    chunk_dir: &Path,
) -> Result<ChunkArtifact> {
    let path = chunk_dir.join(format!("chunk-{}.{}", segment.index, CHUNK_EXTENSION));
    debug!(
        "Cutting segment {}: {:.3}s to {:.3}s",
        segment.index,
        segment.start_secs,
        segment.end_secs()
    );

    processor
        .cut_segment(source, segment.start_secs, segment.length_secs, &path)
        .await?;

    let size_bytes = tokio::fs::metadata(&path)
        .await
        .map_err(|e| {
            MediascribeError::Cut(format!(
                "Chunk {} was not created at {}: {e}",
                segment.index,
                path.display()
            ))
        })?
        .len();

    debug!(
        "Created {} ({:.2} MB)",
        path.display(),
        size_bytes as f64 / (1024.0 * 1024.0)
    );

    Ok(ChunkArtifact {
        segment_index: segment.index,
        path,
        size_bytes,
    })
}
