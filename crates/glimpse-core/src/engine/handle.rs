//! Shared, read-only handle to the caption engine and its readiness state.
//!
//! The handle is built once at startup. If the model fails to load, the
//! handle stays `Failed` for the rest of the process; requests never retry
//! initialization.

use std::sync::Arc;

use super::provider::{CaptionEngine, EngineFactory, EngineInfo};
use crate::config::EngineConfig;
use crate::error::BatchError;

/// Lifecycle of the caption engine.
pub enum EngineState {
    /// Initialization has not run
    Uninitialized,
    /// Model loaded and accepting caption calls
    Ready {
        engine: Arc<dyn CaptionEngine>,
        info: EngineInfo,
    },
    /// Initialization failed; permanent for this process
    Failed { reason: String },
}

pub struct EngineHandle {
    state: EngineState,
}

impl EngineHandle {
    /// A handle that has not been initialized.
    pub fn uninitialized() -> Self {
        Self {
            state: EngineState::Uninitialized,
        }
    }

    /// Build the configured backend and load its model.
    pub async fn from_config(config: &EngineConfig) -> Self {
        tracing::info!(
            "Attempting to initialize {} caption engine...",
            config.backend.as_str()
        );
        match EngineFactory::create(config) {
            Ok(engine) => Self::initialize(engine).await,
            Err(e) => Self::failed(e.to_string()),
        }
    }

    /// Load `engine` and record the outcome.
    pub async fn initialize(engine: Box<dyn CaptionEngine>) -> Self {
        tracing::info!("Loading model on {} backend, this might take some time...", engine.name());
        match engine.load().await {
            Ok(info) => {
                tracing::info!(
                    backend = %info.backend,
                    model = %info.model,
                    device = %info.device_label(),
                    "Caption engine initialized"
                );
                Self {
                    state: EngineState::Ready {
                        engine: Arc::from(engine),
                        info,
                    },
                }
            }
            Err(e) => Self::failed(e.to_string()),
        }
    }

    fn failed(reason: String) -> Self {
        tracing::error!("CRITICAL: Failed to initialize caption engine: {reason}");
        tracing::error!(
            "The service will answer every request as unavailable. \
             Check the engine endpoint, model name and credentials."
        );
        Self {
            state: EngineState::Failed { reason },
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, EngineState::Ready { .. })
    }

    /// Loaded-model details, when ready.
    pub fn info(&self) -> Option<&EngineInfo> {
        match &self.state {
            EngineState::Ready { info, .. } => Some(info),
            _ => None,
        }
    }

    /// Borrow the engine, or fail with `Unavailable`.
    pub fn ready(&self) -> Result<&Arc<dyn CaptionEngine>, BatchError> {
        match &self.state {
            EngineState::Ready { engine, .. } => Ok(engine),
            EngineState::Uninitialized => Err(BatchError::Unavailable(
                "Model not loaded.".to_string(),
            )),
            EngineState::Failed { reason } => Err(BatchError::Unavailable(format!(
                "Model not loaded ({reason})."
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::engine::provider::ImageInput;
    use crate::error::PipelineError;
    use async_trait::async_trait;

    struct StaticEngine {
        load_ok: bool,
    }

    #[async_trait]
    impl CaptionEngine for StaticEngine {
        fn name(&self) -> &str {
            "static"
        }

        async fn load(&self) -> Result<EngineInfo, PipelineError> {
            if self.load_ok {
                Ok(EngineInfo {
                    backend: "static".to_string(),
                    model: "fixed".to_string(),
                    device: Some("cpu".to_string()),
                })
            } else {
                Err(PipelineError::Inference {
                    message: "weights missing".to_string(),
                    status_code: None,
                })
            }
        }

        async fn caption(
            &self,
            _image: &ImageInput,
            _params: &GenerationConfig,
        ) -> Result<String, PipelineError> {
            Ok("a picture".to_string())
        }
    }

    #[tokio::test]
    async fn test_successful_load_is_ready() {
        let handle = EngineHandle::initialize(Box::new(StaticEngine { load_ok: true })).await;
        assert!(handle.is_ready());
        assert!(handle.ready().is_ok());
        assert_eq!(handle.info().unwrap().device.as_deref(), Some("cpu"));
    }

    #[tokio::test]
    async fn test_failed_load_is_unavailable() {
        let handle = EngineHandle::initialize(Box::new(StaticEngine { load_ok: false })).await;
        assert!(!handle.is_ready());
        assert!(handle.info().is_none());
        match handle.ready() {
            Err(BatchError::Unavailable(reason)) => assert!(reason.contains("weights missing")),
            _ => panic!("expected Unavailable"),
        }
        assert!(matches!(handle.state(), EngineState::Failed { .. }));
    }

    #[test]
    fn test_uninitialized_is_unavailable() {
        let handle = EngineHandle::uninitialized();
        assert!(matches!(handle.ready(), Err(BatchError::Unavailable(_))));
    }
}
