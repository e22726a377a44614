//! Sub-configuration structs with deployment defaults.

use serde::{Deserialize, Serialize};

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Caption generation parameters, applied uniformly to every caption call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Maximum caption length in tokens
    pub max_length: u32,

    /// Beam-search width
    pub num_beams: u32,

    /// Stop beam search once every beam has finished
    pub early_stopping: bool,

    /// Penalty applied to repeated tokens (1.0 = none)
    pub repetition_penalty: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_length: 150,
            num_beams: 5,
            early_stopping: true,
            repetition_penalty: 1.2,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,

    /// Caption call timeout in milliseconds
    pub caption_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 10000,
            decode_timeout_ms: 5000,
            caption_timeout_ms: 120_000,
        }
    }
}

/// Which caption engine backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineBackend {
    /// Hugging Face `image-to-text` inference endpoint
    #[default]
    HuggingFace,
    /// Local Ollama server with a vision model
    Ollama,
}

impl EngineBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HuggingFace => "huggingface",
            Self::Ollama => "ollama",
        }
    }
}

/// Caption engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Backend used for captioning
    pub backend: EngineBackend,

    /// Longest edge (pixels) of the image sent to the engine
    pub max_upload_edge: u32,

    /// Hugging Face backend settings
    pub huggingface: HuggingFaceConfig,

    /// Ollama backend settings
    pub ollama: OllamaConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: EngineBackend::default(),
            max_upload_edge: 1024,
            huggingface: HuggingFaceConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

/// Hugging Face inference endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HuggingFaceConfig {
    /// Base URL; the model id is appended as a path segment
    pub endpoint: String,

    /// Model id
    pub model: String,

    /// API token (supports ${ENV_VAR} syntax, empty for none)
    pub api_token: String,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co/models".to_string(),
            model: "Salesforce/blip-image-captioning-large".to_string(),
            api_token: "${HF_TOKEN}".to_string(),
        }
    }
}

/// Ollama configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Ollama API endpoint
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Instruction sent alongside each image
    pub prompt: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llava".to_string(),
            prompt: "Write a one-sentence caption describing this image.".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
