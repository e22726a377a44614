//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.max_length == 0 {
            return Err(ConfigError::ValidationError(
                "generation.max_length must be > 0".into(),
            ));
        }
        if self.generation.num_beams == 0 {
            return Err(ConfigError::ValidationError(
                "generation.num_beams must be > 0".into(),
            ));
        }
        let penalty = self.generation.repetition_penalty;
        if penalty.is_nan() || penalty <= 0.0 {
            return Err(ConfigError::ValidationError(
                "generation.repetition_penalty must be > 0.0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.caption_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.caption_timeout_ms must be > 0".into(),
            ));
        }
        if self.engine.max_upload_edge == 0 {
            return Err(ConfigError::ValidationError(
                "engine.max_upload_edge must be > 0".into(),
            ));
        }
        if self.engine.huggingface.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "engine.huggingface.model must not be empty".into(),
            ));
        }
        if self.engine.ollama.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "engine.ollama.model must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_num_beams() {
        let mut config = Config::default();
        config.generation.num_beams = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("num_beams"));
    }

    #[test]
    fn test_validate_rejects_non_positive_repetition_penalty() {
        let mut config = Config::default();
        config.generation.repetition_penalty = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("repetition_penalty"));

        config.generation.repetition_penalty = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.limits.caption_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("caption_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let mut config = Config::default();
        config.engine.ollama.model = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ollama.model"));
    }
}
