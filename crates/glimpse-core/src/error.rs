//! Error types for the Glimpse captioning pipeline.
//!
//! Errors are split by blast radius: [`BatchError`] aborts a whole request
//! before any report exists, while [`PipelineError`] is scoped to a single
//! image and ends up as data in the report.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Glimpse operations.
#[derive(Error, Debug)]
pub enum GlimpseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Batch-fatal errors
    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failures that abort a batch before any per-image work is reported.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The caption engine never became ready
    #[error("Captioning service is unavailable: {0}")]
    Unavailable(String),

    /// The requested folder is missing or not a directory
    #[error("The folder '{}' does not exist or is not a directory.", .0.display())]
    InvalidInput(PathBuf),

    /// Listing the folder failed after the existence check passed
    #[error("Could not read directory contents: {}", .path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Per-image failures, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image could not be read or decoded
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Caption engine call failed
    #[error("Caption engine error: {message}")]
    Inference {
        message: String,
        status_code: Option<u16>,
    },

    /// Caption engine answered, but not with a usable caption
    #[error("Caption output format unexpected: {0}")]
    MalformedOutput(String),

    /// Caption engine produced only whitespace
    #[error("Caption engine returned an empty caption")]
    EmptyCaption,

    /// Operation timed out
    #[error("Timeout in {stage} stage for {path} after {timeout_ms}ms")]
    Timeout {
        path: PathBuf,
        stage: String,
        timeout_ms: u64,
    },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Unsupported image format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },
}

/// Convenience type alias for Glimpse results.
pub type Result<T> = std::result::Result<T, GlimpseError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message_names_folder() {
        let err = BatchError::InvalidInput(PathBuf::from("/no/such/dir"));
        assert_eq!(
            err.to_string(),
            "The folder '/no/such/dir' does not exist or is not a directory."
        );
    }

    #[test]
    fn test_timeout_message() {
        let err = PipelineError::Timeout {
            path: PathBuf::from("a.jpg"),
            stage: "caption".to_string(),
            timeout_ms: 500,
        };
        assert_eq!(
            err.to_string(),
            "Timeout in caption stage for a.jpg after 500ms"
        );
    }
}
