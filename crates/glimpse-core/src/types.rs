//! Request and report types for the captioning service.
//!
//! These are the shapes that cross the HTTP boundary, plus the transient
//! [`CandidateFile`] that only lives for the duration of one batch.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// Inbound request: caption every image in one folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionRequest {
    /// Path of the folder to scan (not checked by the schema layer)
    pub folder_location: String,
}

/// A directory entry that passed the extension filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Entry name within the scanned folder
    pub filename: String,
    /// Absolute path of the entry
    pub absolute_path: PathBuf,
}

/// One successfully captioned image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionResult {
    /// Absolute path to the source image, rendered lossily on the wire
    #[serde(serialize_with = "serialize_path_lossy")]
    pub image_path: PathBuf,
    /// Generated caption, whitespace-trimmed
    pub description: String,
}

fn serialize_path_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&path.display())
}

/// One image that could not be captioned.
///
/// Serialized as the single string `"<filename>: <message>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingError {
    pub filename: String,
    pub message: String,
}

impl ProcessingError {
    pub fn new(filename: impl Into<String>, error: &PipelineError) -> Self {
        Self {
            filename: filename.into(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for ProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.filename, self.message)
    }
}

impl Serialize for ProcessingError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProcessingError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let (filename, message) = raw.split_once(": ").unwrap_or((raw.as_str(), ""));
        Ok(Self {
            filename: filename.to_string(),
            message: message.to_string(),
        })
    }
}

/// Aggregate outcome of one batch.
///
/// `successfully_captioned` always equals `results.len()`, and
/// `results.len() + errors.len()` never exceeds `total_images_found`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionSummaryReport {
    pub total_images_found: usize,
    pub successfully_captioned: usize,
    pub results: Vec<CaptionResult>,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ProcessingError>,
}

impl CaptionSummaryReport {
    /// Report for a folder with no candidates.
    pub fn empty(message: String) -> Self {
        Self {
            total_images_found: 0,
            successfully_captioned: 0,
            results: Vec::new(),
            message,
            errors: Vec::new(),
        }
    }
}
