//! Caption engine integration.
//!
//! Provides the backend abstraction (Hugging Face inference endpoint or a
//! local Ollama server) and the readiness handle the batch processor is
//! built around.

pub(crate) mod handle;
pub(crate) mod huggingface;
pub(crate) mod ollama;
pub(crate) mod provider;

pub use handle::{EngineHandle, EngineState};
pub use provider::{CaptionEngine, EngineFactory, EngineInfo, ImageInput};
