pub mod cleanup;
pub mod config;
pub mod error;
pub mod media;
pub mod pipeline;
pub mod transcribe;

pub use cleanup::TempTracker;
pub use config::Config;
pub use error::{MediascribeError, Result};
pub use pipeline::{
    print_summary, transcribe_media, PipelineConfig, PipelineResult, PipelineStats,
};
