//! Human-readable batch summaries.
//!
//! [`summarize`] is a pure function of three counts. The result renders
//! through `Display`, so the orchestrator never builds messages by hand.

use std::fmt;
use std::path::Path;

use super::discovery::extensions_display;

/// How a batch turned out, by count of successes against candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Summarize was asked about an empty batch
    NothingProcessed,
    /// Every candidate was captioned
    AllSucceeded { total: usize },
    /// Some, but not all, candidates were captioned
    Partial { succeeded: usize, total: usize },
    /// Candidates existed but none was captioned
    NoneSucceeded { total: usize },
}

/// Outcome plus the unaccounted-failure flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub outcome: Outcome,
    /// Some candidates are neither results nor recorded errors
    pub unrecorded_failures: bool,
}

/// Classify a finished batch.
pub fn summarize(total_found: usize, succeeded: usize, errors: usize) -> Summary {
    let outcome = if total_found == 0 {
        Outcome::NothingProcessed
    } else if succeeded == total_found {
        Outcome::AllSucceeded { total: total_found }
    } else if succeeded > 0 {
        Outcome::Partial {
            succeeded,
            total: total_found,
        }
    } else {
        Outcome::NoneSucceeded { total: total_found }
    };

    Summary {
        outcome,
        unrecorded_failures: errors == 0 && succeeded < total_found,
    }
}

/// Message for a folder without a single candidate.
pub fn no_images_message(folder: &Path) -> String {
    format!(
        "No images with supported extensions {} found in the folder: {}",
        extensions_display(),
        folder.display()
    )
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingProcessed => write!(f, "No images were processed or found."),
            Self::AllSucceeded { total } => write!(
                f,
                "Successfully generated captions for all {total} found image(s)."
            ),
            Self::Partial { succeeded, total } => write!(
                f,
                "Generated captions for {succeeded} out of {total} found image(s). \
                 See errors for details on failures."
            ),
            Self::NoneSucceeded { total } => write!(
                f,
                "Attempted to process {total} image(s), but no captions were successfully \
                 generated. See errors for details."
            ),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.outcome)?;
        if self.unrecorded_failures {
            write!(
                f,
                " Some images may have failed processing without explicit error \
                 messages being captured in the error list."
            )?;
        }
        Ok(())
    }
}
