//! Batch orchestration - scan, decode, caption, summarize.
//!
//! Candidates are handled one at a time. Each one ends as either a
//! `CaptionResult` or a `ProcessingError`; nothing a single image does can
//! stop the loop. Only the readiness check and the scan can fail the batch.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{Config, GenerationConfig, LimitsConfig};
use crate::engine::{CaptionEngine, EngineHandle, ImageInput};
use crate::error::{BatchError, PipelineError};
use crate::types::{CandidateFile, CaptionResult, CaptionSummaryReport, ProcessingError};

use super::decode::{format_to_string, ImageDecoder};
use super::discovery::DirectoryScanner;
use super::summary::{no_images_message, summarize};

/// Drives one folder through the captioning pipeline.
pub struct BatchProcessor {
    scanner: DirectoryScanner,
    decoder: ImageDecoder,
    engine: Arc<EngineHandle>,
    generation: GenerationConfig,
    limits: LimitsConfig,
    max_upload_edge: u32,
}

impl BatchProcessor {
    /// Create a processor around an already-initialized engine handle.
    pub fn new(config: &Config, engine: Arc<EngineHandle>) -> Self {
        Self {
            scanner: DirectoryScanner::new(),
            decoder: ImageDecoder::new(config.limits.clone()),
            engine,
            generation: config.generation.clone(),
            limits: config.limits.clone(),
            max_upload_edge: config.engine.max_upload_edge,
        }
    }

    pub fn engine(&self) -> &Arc<EngineHandle> {
        &self.engine
    }

    /// Caption every supported image directly inside `folder`.
    pub async fn process(&self, folder: &Path) -> Result<CaptionSummaryReport, BatchError> {
        let engine = self.engine.ready().inspect_err(|_| {
            tracing::error!("Caption engine is not available. Initialization failed at startup.");
        })?;

        tracing::info!("Received request to caption images in folder: {}", folder.display());

        let candidates = self.scanner.scan(folder).inspect_err(|e| {
            tracing::error!("{e}");
        })?;
        let total = candidates.len();

        if total == 0 {
            let message = no_images_message(folder);
            tracing::info!("{message}");
            return Ok(CaptionSummaryReport::empty(message));
        }

        tracing::info!(
            "Found {total} image(s) with supported extensions to process in folder: {}",
            folder.display()
        );
        tracing::info!("Using generation parameters for captions: {:?}", self.generation);

        let start = Instant::now();
        let mut results = Vec::with_capacity(total);
        let mut errors = Vec::new();

        for candidate in &candidates {
            match self.process_candidate(&**engine, candidate).await {
                Ok(result) => results.push(result),
                Err(error) => errors.push(error),
            }
        }

        let summary = summarize(total, results.len(), errors.len());
        if summary.unrecorded_failures {
            tracing::warn!(
                "Discrepancy: {total} images found, {} captioned, but no errors recorded.",
                results.len()
            );
        }
        tracing::info!(
            "Batch finished in {:?}: {} succeeded, {} failed",
            start.elapsed(),
            results.len(),
            errors.len()
        );

        Ok(CaptionSummaryReport {
            total_images_found: total,
            successfully_captioned: results.len(),
            results,
            message: summary.to_string(),
            errors,
        })
    }

    /// Run one candidate to a terminal outcome.
    async fn process_candidate(
        &self,
        engine: &dyn CaptionEngine,
        candidate: &CandidateFile,
    ) -> Result<CaptionResult, ProcessingError> {
        tracing::info!("Processing image: {}", candidate.filename);

        match self.caption_file(engine, candidate).await {
            Ok(description) => {
                tracing::info!("Generated caption for '{}': {description}", candidate.filename);
                Ok(CaptionResult {
                    image_path: candidate.absolute_path.clone(),
                    description,
                })
            }
            Err(e) => {
                tracing::warn!("Skipping '{}': {e}", candidate.filename);
                Err(ProcessingError::new(&candidate.filename, &e))
            }
        }
    }

    async fn caption_file(
        &self,
        engine: &dyn CaptionEngine,
        candidate: &CandidateFile,
    ) -> Result<String, PipelineError> {
        let path = candidate.absolute_path.as_path();

        let decode_start = Instant::now();
        let decoded = self.decoder.decode(path).await?;
        tracing::debug!(
            "  Decode: {:?} ({}, {}x{}, {} bytes)",
            decode_start.elapsed(),
            format_to_string(decoded.format),
            decoded.width,
            decoded.height,
            decoded.file_size
        );

        let max_edge = self.max_upload_edge;
        let pixels = decoded.pixels;
        let image = tokio::task::spawn_blocking(move || ImageInput::from_rgb(pixels, max_edge))
            .await
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Task join error: {}", e),
            })??;

        let caption_start = Instant::now();
        let timeout_ms = self.limits.caption_timeout_ms;
        let raw = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            engine.caption(&image, &self.generation),
        )
        .await
        .map_err(|_| PipelineError::Timeout {
            path: path.to_path_buf(),
            stage: "caption".to_string(),
            timeout_ms,
        })??;
        tracing::debug!("  Caption: {:?}", caption_start.elapsed());

        let description = raw.trim();
        if description.is_empty() {
            return Err(PipelineError::EmptyCaption);
        }
        Ok(description.to_string())
    }
}
