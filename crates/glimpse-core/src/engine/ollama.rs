//! Ollama backend for local vision model captioning.
//!
//! Talks to a local Ollama instance via its HTTP API.
//! No authentication; Ollama must be running locally.

use super::provider::{CaptionEngine, EngineInfo, ImageInput};
use crate::config::GenerationConfig;
use crate::error::PipelineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long Ollama keeps the model resident after the last call.
const KEEP_ALIVE: &str = "30m";

pub struct OllamaEngine {
    endpoint: String,
    model: String,
    prompt: String,
    client: reqwest::Client,
}

impl OllamaEngine {
    pub fn new(endpoint: &str, model: &str, prompt: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            prompt: prompt.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn build_request(&self, image: &ImageInput, params: &GenerationConfig) -> OllamaRequest {
        OllamaRequest {
            model: self.model.clone(),
            prompt: Some(self.prompt.clone()),
            images: vec![image.data.clone()],
            stream: false,
            keep_alive: KEEP_ALIVE,
            options: Some(OllamaOptions {
                num_predict: params.max_length,
                repeat_penalty: params.repetition_penalty,
            }),
        }
    }

    /// Ask Ollama which device holds the loaded model.
    async fn resident_device(&self) -> Option<String> {
        let url = format!("{}/api/ps", self.endpoint);
        let resp = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .ok()?;
        let running: RunningModels = resp.json().await.ok()?;
        running.device_for(&self.model)
    }
}

/// Ollama /api/generate request body.
#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
    stream: bool,
    keep_alive: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Serialize)]
struct OllamaOptions {
    num_predict: u32,
    repeat_penalty: f32,
}

/// Ollama /api/generate response.
#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

/// Ollama /api/ps response.
#[derive(Deserialize)]
struct RunningModels {
    #[serde(default)]
    models: Vec<RunningModel>,
}

#[derive(Deserialize)]
struct RunningModel {
    name: String,
    #[serde(default)]
    size_vram: u64,
}

impl RunningModels {
    /// Model names may carry an implicit `:latest` tag.
    fn device_for(&self, model: &str) -> Option<String> {
        self.models
            .iter()
            .find(|m| m.name == model || m.name.split(':').next() == Some(model))
            .map(|m| if m.size_vram > 0 { "gpu" } else { "cpu" }.to_string())
    }
}

#[async_trait]
impl CaptionEngine for OllamaEngine {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn load(&self) -> Result<EngineInfo, PipelineError> {
        // An empty generate request loads the model into memory.
        let url = format!("{}/api/generate", self.endpoint);
        let body = OllamaRequest {
            model: self.model.clone(),
            prompt: None,
            images: vec![],
            stream: false,
            keep_alive: KEEP_ALIVE,
            options: None,
        };

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::Inference {
                message: format!("Ollama request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Inference {
                message: format!(
                    "Ollama failed to load model '{}': HTTP {status}: {text}",
                    self.model
                ),
                status_code: Some(status.as_u16()),
            });
        }

        tracing::debug!("Ollama has no beam search; num_beams and early_stopping are not sent");

        Ok(EngineInfo {
            backend: self.name().to_string(),
            model: self.model.clone(),
            device: self.resident_device().await,
        })
    }

    async fn caption(
        &self,
        image: &ImageInput,
        params: &GenerationConfig,
    ) -> Result<String, PipelineError> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = self.build_request(image, params);

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::Inference {
                message: format!("Ollama request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Inference {
                message: format!("Ollama HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let ollama_resp: OllamaResponse = resp.json().await.map_err(|e| {
            PipelineError::MalformedOutput(format!("Failed to parse Ollama response: {e}"))
        })?;

        if ollama_resp.response.trim().is_empty() {
            return Err(PipelineError::EmptyCaption);
        }
        Ok(ollama_resp.response)
    }
}
