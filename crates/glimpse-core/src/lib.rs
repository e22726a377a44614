//! Glimpse Core - caption every image in a folder.
//!
//! Glimpse scans one directory, decodes each supported image, asks a
//! captioning model for a description, and returns a per-file and aggregate
//! report. Images are processed one after another and a failing image never
//! stops the rest of the batch.
//!
//! # Architecture
//!
//! ```text
//! Folder → Scan → Decode (RGB) → Caption Engine → Summary → Report
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use glimpse_core::{BatchProcessor, Config, EngineHandle};
//!
//! #[tokio::main]
//! async fn main() -> glimpse_core::Result<()> {
//!     let config = Config::load()?;
//!     let engine = Arc::new(EngineHandle::from_config(&config.engine).await);
//!     let processor = BatchProcessor::new(&config, engine);
//!
//!     let report = processor.process("./photos".as_ref()).await?;
//!     println!("{}", report.message);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use engine::{CaptionEngine, EngineHandle, EngineInfo, EngineState, ImageInput};
pub use error::{BatchError, ConfigError, GlimpseError, PipelineError, PipelineResult, Result};
pub use pipeline::BatchProcessor;
pub use types::{
    CandidateFile, CaptionRequest, CaptionResult, CaptionSummaryReport, ProcessingError,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
