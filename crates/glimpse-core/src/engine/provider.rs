//! Caption engine trait and the image payload it consumes.
//!
//! Defines the interface every backend implements, plus the factory that
//! creates the configured backend.

use crate::config::{EngineBackend, EngineConfig, GenerationConfig};
use crate::error::PipelineError;
use async_trait::async_trait;
use base64::Engine;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

/// Base64-encoded PNG ready to send to a caption engine.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type of `data`
    pub media_type: String,
    /// Width of the encoded image
    pub width: u32,
    /// Height of the encoded image
    pub height: u32,
}

impl ImageInput {
    /// Encode RGB pixels as PNG, downscaling so the longest edge is at most
    /// `max_edge`. Aspect ratio is preserved.
    pub fn from_rgb(pixels: RgbImage, max_edge: u32) -> Result<Self, PipelineError> {
        let mut image = DynamicImage::ImageRgb8(pixels);
        if image.width() > max_edge || image.height() > max_edge {
            image = image.thumbnail(max_edge, max_edge);
        }

        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| PipelineError::Inference {
                message: format!("Failed to encode image for upload: {e}"),
                status_code: None,
            })?;

        Ok(Self {
            data: base64::engine::general_purpose::STANDARD.encode(buffer.into_inner()),
            media_type: "image/png".to_string(),
            width: image.width(),
            height: image.height(),
        })
    }

    /// Return a data URL for APIs that take one.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// What a backend reports once its model is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInfo {
    /// Backend identifier ("huggingface", "ollama")
    pub backend: String,
    /// Model identifier
    pub model: String,
    /// Device the model runs on, when the backend reports it
    pub device: Option<String>,
}

impl EngineInfo {
    pub fn device_label(&self) -> &str {
        self.device.as_deref().unwrap_or("unreported")
    }
}

/// Trait that all caption backends implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn CaptionEngine>` for dynamic dispatch).
#[async_trait]
pub trait CaptionEngine: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Load the model and confirm it can serve caption calls.
    async fn load(&self) -> Result<EngineInfo, PipelineError>;

    /// Caption one image. The returned text is non-empty but may carry
    /// surrounding whitespace.
    async fn caption(
        &self,
        image: &ImageInput,
        params: &GenerationConfig,
    ) -> Result<String, PipelineError>;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Factory that creates the configured backend.
pub struct EngineFactory;

impl EngineFactory {
    pub fn create(config: &EngineConfig) -> Result<Box<dyn CaptionEngine>, PipelineError> {
        match config.backend {
            EngineBackend::HuggingFace => {
                let cfg = &config.huggingface;
                let token = resolve_env_var(&cfg.api_token);
                if token.is_none() {
                    tracing::debug!("No Hugging Face API token set, requests are unauthenticated");
                }
                Ok(Box::new(super::huggingface::HuggingFaceEngine::new(
                    &cfg.endpoint,
                    &cfg.model,
                    token,
                )?))
            }
            EngineBackend::Ollama => {
                let cfg = &config.ollama;
                Ok(Box::new(super::ollama::OllamaEngine::new(
                    &cfg.endpoint,
                    &cfg.model,
                    &cfg.prompt,
                )))
            }
        }
    }
}
