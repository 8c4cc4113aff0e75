pub mod openai;

use crate::error::Result;
use crate::media::cut::ChunkArtifact;
use async_trait::async_trait;
use std::time::Duration;

/// One chunk's transcription outcome. A failed chunk keeps its index slot
/// for reporting but contributes no text to the joined transcript.
#[derive(Debug, Clone)]
pub struct TranscriptPart {
    pub segment_index: usize,
    pub text: Option<String>,
    pub error: Option<String>,
}

impl TranscriptPart {
    pub fn success(segment_index: usize, text: String) -> Self {
        Self {
            segment_index,
            text: Some(text),
            error: None,
        }
    }

    pub fn failed(segment_index: usize, reason: String) -> Self {
        Self {
            segment_index,
            text: None,
            error: Some(reason),
        }
    }

    pub fn is_success(&self) -> bool {
        self.text.is_some()
    }
}

/// A speech-to-text backend. Takes one bounded-duration audio file per call
/// and returns its transcript as plain text, with no cross-chunk context.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, chunk: &ChunkArtifact) -> Result<String>;

    /// Backend name for logs and summaries.
    fn name(&self) -> &'static str;

    /// Hard per-request duration ceiling the service enforces. Planned
    /// chunks must stay strictly below this.
    fn max_chunk_duration(&self) -> Duration;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_part_carries_text() {
        let part = TranscriptPart::success(3, "hello".to_string());
        assert!(part.is_success());
        assert_eq!(part.segment_index, 3);
        assert_eq!(part.text.as_deref(), Some("hello"));
        assert!(part.error.is_none());
    }

    #[test]
    fn test_failed_part_carries_reason_only() {
        let part = TranscriptPart::failed(1, "timeout".to_string());
        assert!(!part.is_success());
        assert!(part.text.is_none());
        assert_eq!(part.error.as_deref(), Some("timeout"));
    }
}
