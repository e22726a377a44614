//! Hugging Face inference endpoint backend.
//!
//! Targets an `image-to-text` pipeline (BLIP by default). The endpoint answers
//! with a list of `{ "generated_text": ... }` objects; anything else is
//! treated as a malformed response for that image.

use super::provider::{CaptionEngine, EngineInfo, ImageInput};
use crate::config::GenerationConfig;
use crate::error::PipelineError;
use async_trait::async_trait;
use image::{Rgb, RgbImage};
use serde::Serialize;
use serde_json::Value;

/// Edge length of the synthetic image used to warm the model.
const WARMUP_EDGE: u32 = 32;

pub struct HuggingFaceEngine {
    url: String,
    model: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HuggingFaceEngine {
    pub fn new(endpoint: &str, model: &str, token: Option<String>) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| PipelineError::Inference {
                message: format!("Failed to build HTTP client: {e}"),
                status_code: None,
            })?;

        Ok(Self {
            url: format!("{}/{}", endpoint.trim_end_matches('/'), model),
            model: model.to_string(),
            token,
            client,
        })
    }
}

/// Request body for an `image-to-text` pipeline.
#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters<'a>,
}

#[derive(Serialize)]
struct InferenceParameters<'a> {
    generate_kwargs: &'a GenerationConfig,
}

/// Pull the caption out of an `image-to-text` response.
///
/// Expects a non-empty array whose first element carries a string
/// `generated_text`.
fn extract_generated_text(value: &Value) -> Result<String, PipelineError> {
    let first = match value.as_array() {
        Some(items) if !items.is_empty() => &items[0],
        Some(_) => {
            return Err(PipelineError::MalformedOutput(
                "engine returned an empty list".to_string(),
            ))
        }
        None => {
            return Err(PipelineError::MalformedOutput(format!(
                "expected a list, got {value}"
            )))
        }
    };

    let text = first
        .get("generated_text")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            PipelineError::MalformedOutput(format!("first element has no generated_text: {first}"))
        })?;

    if text.trim().is_empty() {
        return Err(PipelineError::EmptyCaption);
    }
    Ok(text.to_string())
}

#[async_trait]
impl CaptionEngine for HuggingFaceEngine {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn load(&self) -> Result<EngineInfo, PipelineError> {
        // A caption round-trip forces the endpoint to load the model.
        let probe = RgbImage::from_pixel(WARMUP_EDGE, WARMUP_EDGE, Rgb([127, 127, 127]));
        let image = ImageInput::from_rgb(probe, WARMUP_EDGE)?;
        let params = GenerationConfig {
            num_beams: 1,
            max_length: 16,
            ..GenerationConfig::default()
        };
        self.caption(&image, &params).await?;

        Ok(EngineInfo {
            backend: self.name().to_string(),
            model: self.model.clone(),
            device: None,
        })
    }

    async fn caption(
        &self,
        image: &ImageInput,
        params: &GenerationConfig,
    ) -> Result<String, PipelineError> {
        let body = InferenceRequest {
            inputs: &image.data,
            parameters: InferenceParameters {
                generate_kwargs: params,
            },
        };

        let mut request = self
            .client
            .post(&self.url)
            .header("x-wait-for-model", "true")
            .json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await.map_err(|e| PipelineError::Inference {
            message: format!("Hugging Face request failed: {e}"),
            status_code: None,
        })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Inference {
                message: format!("Hugging Face HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let value: Value = resp.json().await.map_err(|e| PipelineError::Inference {
            message: format!("Failed to parse Hugging Face response: {e}"),
            status_code: None,
        })?;

        extract_generated_text(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_generated_text() {
        let value = json!([{ "generated_text": "  a cat sitting on a couch " }]);
        assert_eq!(
            extract_generated_text(&value).unwrap(),
            "  a cat sitting on a couch "
        );
    }

    #[test]
    fn test_extract_rejects_empty_list() {
        let err = extract_generated_text(&json!([])).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedOutput(_)));
    }

    #[test]
    fn test_extract_rejects_non_list() {
        let err = extract_generated_text(&json!({ "error": "Model is loading" })).unwrap_err();
        assert!(err.to_string().contains("expected a list"));
    }

    #[test]
    fn test_extract_rejects_missing_field() {
        let err = extract_generated_text(&json!([{ "label": "cat" }])).unwrap_err();
        assert!(err.to_string().contains("generated_text"));

        let err = extract_generated_text(&json!([{ "generated_text": 42 }])).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedOutput(_)));
    }

    #[test]
    fn test_extract_rejects_blank_text() {
        let err = extract_generated_text(&json!([{ "generated_text": "   " }])).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyCaption));
    }

    #[test]
    fn test_request_body_shape() {
        let params = GenerationConfig::default();
        let body = InferenceRequest {
            inputs: "aGVsbG8=",
            parameters: InferenceParameters {
                generate_kwargs: &params,
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["inputs"], "aGVsbG8=");
        let kwargs = &value["parameters"]["generate_kwargs"];
        assert_eq!(kwargs["max_length"], 150);
        assert_eq!(kwargs["num_beams"], 5);
        assert_eq!(kwargs["early_stopping"], true);
        assert!((kwargs["repetition_penalty"].as_f64().unwrap() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_url_joins_model() {
        let engine =
            HuggingFaceEngine::new("https://hf.example/models/", "org/model", None).unwrap();
        assert_eq!(engine.url, "https://hf.example/models/org/model");
    }
}
