//! Mapping of batch-fatal errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use glimpse_core::BatchError;
use serde::Serialize;

/// Error body, `{ "detail": "..." }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// A request that produced no report.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl From<BatchError> for ApiError {
    fn from(err: BatchError) -> Self {
        let status = match &err {
            BatchError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            BatchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            BatchError::DirectoryRead { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_unavailable_maps_to_503() {
        let err = ApiError::from(BatchError::Unavailable("Model not loaded.".to_string()));
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.detail.contains("unavailable"));
    }

    #[test]
    fn test_invalid_input_maps_to_400() {
        let err = ApiError::from(BatchError::InvalidInput(PathBuf::from("/missing")));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.detail,
            "The folder '/missing' does not exist or is not a directory."
        );
    }

    #[tokio::test]
    async fn test_directory_read_maps_to_500_with_detail() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("vanished");
        let source = walkdir::WalkDir::new(&missing)
            .into_iter()
            .next()
            .unwrap()
            .unwrap_err();

        let err = ApiError::from(BatchError::DirectoryRead {
            path: missing.clone(),
            source,
        });
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.detail,
            format!("Could not read directory contents: {}", missing.display())
        );

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(value["detail"]
            .as_str()
            .unwrap()
            .starts_with("Could not read directory contents: "));
    }

    #[test]
    fn test_into_response_keeps_status() {
        let response =
            ApiError::from(BatchError::InvalidInput(PathBuf::from("/x"))).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
