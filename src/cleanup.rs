use crate::error::Result;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Distinguishes directories created within the same millisecond.
static DIR_SEQ: AtomicU64 = AtomicU64::new(0);

/// Collects every temporary path the pipeline creates and removes them all
/// at the end of the run, success or failure alike.
#[derive(Debug, Default)]
pub struct TempTracker {
    paths: Vec<PathBuf>,
}

impl TempTracker {
    pub fn new() -> Self {
        Self { paths: Vec::new() }
    }

    /// Register a path for removal at the end of the run.
    pub fn track(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.paths.contains(&path) {
            debug!("Tracking temp path {}", path.display());
            self.paths.push(path);
        }
    }

    /// Create a uniquely named directory under the system temp root and
    /// register it in the same step, so allocation always implies cleanup.
    pub fn create_temp_dir(&mut self, prefix: &str) -> Result<PathBuf> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let seq = DIR_SEQ.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "{}-{}-{}-{}",
            prefix,
            std::process::id(),
            millis,
            seq
        ));
        std::fs::create_dir_all(&dir)?;
        self.track(&dir);
        Ok(dir)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Remove every tracked path (files directly, directories recursively).
    /// Best-effort per path: a failed removal is logged and the rest are
    /// still attempted. Calling this again is a no-op.
    pub fn cleanup_all(&mut self) {
        for path in std::mem::take(&mut self.paths) {
            if !path.exists() {
                continue;
            }
            let removed = if path.is_dir() {
                std::fs::remove_dir_all(&path)
            } else {
                std::fs::remove_file(&path)
            };
            match removed {
                Ok(()) => debug!("Removed temp path {}", path.display()),
                Err(e) => warn!("Failed to remove temp path {}: {}", path.display(), e),
            }
        }
    }
}

// Backstop so an early return or panic cannot leak tracked paths.
impl Drop for TempTracker {
    fn drop(&mut self) {
        self.cleanup_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cleanup_removes_files_and_dirs() {
        let scratch = tempdir().unwrap();
        let file = scratch.path().join("audio.mp3");
        let dir = scratch.path().join("chunks");
        std::fs::write(&file, b"data").unwrap();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("chunk-0.mp3"), b"data").unwrap();

        let mut tracker = TempTracker::new();
        tracker.track(&file);
        tracker.track(&dir);
        assert_eq!(tracker.len(), 2);

        tracker.cleanup_all();
        assert!(!file.exists());
        assert!(!dir.exists());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let scratch = tempdir().unwrap();
        let file = scratch.path().join("audio.mp3");
        std::fs::write(&file, b"data").unwrap();

        let mut tracker = TempTracker::new();
        tracker.track(&file);
        tracker.cleanup_all();
        tracker.cleanup_all();
        assert!(!file.exists());
    }

    #[test]
    fn test_cleanup_skips_already_missing_paths() {
        let scratch = tempdir().unwrap();
        let mut tracker = TempTracker::new();
        tracker.track(scratch.path().join("never-created.mp3"));
        tracker.cleanup_all();
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_file_inside_tracked_dir_is_tolerated() {
        // The dir is tracked first and removed recursively; the file entry
        // is already gone by the time the tracker reaches it.
        let scratch = tempdir().unwrap();
        let dir = scratch.path().join("chunks");
        std::fs::create_dir_all(&dir).unwrap();
        let chunk = dir.join("chunk-0.mp3");
        std::fs::write(&chunk, b"data").unwrap();

        let mut tracker = TempTracker::new();
        tracker.track(&dir);
        tracker.track(&chunk);
        tracker.cleanup_all();
        assert!(!dir.exists());
        assert!(!chunk.exists());
    }

    #[test]
    fn test_duplicate_tracking_is_deduplicated() {
        let mut tracker = TempTracker::new();
        tracker.track("/tmp/mediascribe-dup-check");
        tracker.track("/tmp/mediascribe-dup-check");
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_drop_removes_leftovers() {
        let scratch = tempdir().unwrap();
        let file = scratch.path().join("leftover.mp3");
        std::fs::write(&file, b"data").unwrap();

        {
            let mut tracker = TempTracker::new();
            tracker.track(&file);
        }
        assert!(!file.exists());
    }

    #[test]
    fn test_create_temp_dir_registers_itself() {
        let mut tracker = TempTracker::new();
        let dir = tracker.create_temp_dir("mediascribe-test").unwrap();
        assert!(dir.exists());
        assert_eq!(tracker.len(), 1);

        tracker.cleanup_all();
        assert!(!dir.exists());
    }
}
