//! Request handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use glimpse_core::{CaptionRequest, CaptionSummaryReport, EngineState};
use serde::Serialize;
use std::path::Path;

use super::error::ApiError;
use super::AppState;

/// `POST /caption-images/`
pub async fn caption_images(
    State(state): State<AppState>,
    Json(request): Json<CaptionRequest>,
) -> Result<Json<CaptionSummaryReport>, ApiError> {
    // One batch at a time; later requests queue here.
    let _guard = state.batch_lock.lock().await;

    let report = state
        .processor
        .process(Path::new(&request.folder_location))
        .await?;
    Ok(Json(report))
}

/// Engine readiness as reported by `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let empty = HealthResponse {
        status: "uninitialized",
        backend: None,
        model: None,
        device: None,
        reason: None,
    };

    match state.processor.engine().state() {
        EngineState::Ready { info, .. } => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ready",
                backend: Some(info.backend.clone()),
                model: Some(info.model.clone()),
                device: info.device.clone(),
                ..empty
            }),
        ),
        EngineState::Failed { reason } => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unavailable",
                reason: Some(reason.clone()),
                ..empty
            }),
        ),
        EngineState::Uninitialized => (StatusCode::SERVICE_UNAVAILABLE, Json(empty)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use glimpse_core::config::GenerationConfig;
    use glimpse_core::{
        BatchProcessor, CaptionEngine, Config, EngineHandle, EngineInfo, ImageInput,
        PipelineError,
    };
    use image::{ImageFormat, Rgb, RgbImage};
    use std::sync::Arc;

    struct FixedEngine;

    #[async_trait]
    impl CaptionEngine for FixedEngine {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn load(&self) -> Result<EngineInfo, PipelineError> {
            Ok(EngineInfo {
                backend: "fixed".to_string(),
                model: "fixed-model".to_string(),
                device: Some("cpu".to_string()),
            })
        }

        async fn caption(
            &self,
            _image: &ImageInput,
            _params: &GenerationConfig,
        ) -> Result<String, PipelineError> {
            Ok(" a red square \n".to_string())
        }
    }

    async fn ready_state() -> AppState {
        let handle = EngineHandle::initialize(Box::new(FixedEngine)).await;
        AppState::new(BatchProcessor::new(&Config::default(), Arc::new(handle)))
    }

    fn unready_state() -> AppState {
        AppState::new(BatchProcessor::new(
            &Config::default(),
            Arc::new(EngineHandle::uninitialized()),
        ))
    }

    fn request(folder: &Path) -> Json<CaptionRequest> {
        Json(CaptionRequest {
            folder_location: folder.to_string_lossy().into_owned(),
        })
    }

    #[tokio::test]
    async fn test_caption_images_returns_report() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(16, 16, Rgb([255, 0, 0]))
            .save_with_format(dir.path().join("a.jpg"), ImageFormat::Jpeg)
            .unwrap();
        std::fs::write(dir.path().join("b.txt"), b"text").unwrap();
        std::fs::write(dir.path().join("c.png"), b"garbage").unwrap();

        let Json(report) = caption_images(State(ready_state().await), request(dir.path()))
            .await
            .unwrap();

        assert_eq!(report.total_images_found, 2);
        assert_eq!(report.successfully_captioned, 1);
        assert_eq!(report.results[0].description, "a red square");

        let value = serde_json::to_value(&report).unwrap();
        let error = value["errors"][0].as_str().unwrap();
        assert!(error.starts_with("c.png: "));
    }

    #[tokio::test]
    async fn test_caption_images_missing_folder_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let err = caption_images(
            State(ready_state().await),
            request(&dir.path().join("missing")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_caption_images_unready_engine_is_503() {
        let dir = tempfile::tempdir().unwrap();
        let err = caption_images(State(unready_state()), request(dir.path()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_reports_ready_engine() {
        let (status, Json(body)) = health(State(ready_state().await)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ready");
        assert_eq!(body.model.as_deref(), Some("fixed-model"));
        assert_eq!(body.device.as_deref(), Some("cpu"));
    }

    #[tokio::test]
    async fn test_health_reports_unready_engine() {
        let (status, Json(body)) = health(State(unready_state())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "uninitialized");
    }
}
