//! Batch captioning pipeline components.
//!
//! - **discovery**: Find candidate images directly inside a folder
//! - **decode**: Load images and normalize them to RGB
//! - **summary**: Turn batch counts into a status message
//! - **processor**: Orchestrates the whole batch

pub mod decode;
pub mod discovery;
pub mod processor;
pub mod summary;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::{DirectoryScanner, SUPPORTED_EXTENSIONS};
pub use processor::BatchProcessor;
pub use summary::{summarize, Outcome, Summary};
