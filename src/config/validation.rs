//! Configuration validation.
//!
//! Serde handles the syntactic checks; this module runs the semantic ones
//! and reports every violation, not just the first.

use thiserror::Error;

use crate::config::schema::AppConfig;

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("S3_BUCKET is required outside of unit tests")]
    MissingBucket,

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Validate a configuration, collecting all errors.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let bucket_missing = config
        .s3_bucket
        .as_deref()
        .map(|b| b.trim().is_empty())
        .unwrap_or(true);
    if !config.unittest && bucket_missing {
        errors.push(ValidationError::MissingBucket);
    }

    if !LOG_LEVELS.contains(&config.root_log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.root_log_level.clone()));
    }

    if config.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero("REQUEST_TIMEOUT_SECS"));
    }
    if config.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("MAX_BODY_BYTES"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
