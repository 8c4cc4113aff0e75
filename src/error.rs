use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediascribeError {
    #[error("Unsupported media format '{extension}' (supported: {supported})")]
    UnsupportedFormat { extension: String, supported: String },

    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("Input file is empty (0 bytes): {0}")]
    EmptyInput(String),

    #[error("Audio extraction failed: {0}")]
    Extraction(String),

    #[error("Duration probe failed: {0}")]
    Probe(String),

    #[error("Segment cut failed: {0}")]
    Cut(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MediascribeError>;
