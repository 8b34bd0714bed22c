//! Configuration loading and layering.
//!
//! Precedence, lowest first:
//! 1. [`AppConfig::default`]
//! 2. the JSON object in `JSON_CONFIG_OVERRIDE`
//! 3. explicit overrides passed by the caller
//! 4. the `DEBUG` and `ROOT_LOG_LEVEL` environment variables

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const JSON_CONFIG_OVERRIDE_ENV: &str = "JSON_CONFIG_OVERRIDE";
pub const DEBUG_ENV: &str = "DEBUG";
pub const ROOT_LOG_LEVEL_ENV: &str = "ROOT_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON_CONFIG_OVERRIDE is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("{0} must be a JSON object")]
    NotAnObject(&'static str),

    #[error("configuration does not match schema: {0}")]
    Schema(#[source] serde_json::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builder that layers configuration sources into an [`AppConfig`].
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    json_override: Option<String>,
    overrides: Option<Value>,
    debug_env: Option<String>,
    root_log_level_env: Option<String>,
}

impl ConfigLoader {
    /// Loader with no sources beyond the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader seeded from the process environment.
    pub fn from_env() -> Self {
        Self {
            json_override: std::env::var(JSON_CONFIG_OVERRIDE_ENV).ok(),
            overrides: None,
            debug_env: std::env::var(DEBUG_ENV).ok(),
            root_log_level_env: std::env::var(ROOT_LOG_LEVEL_ENV).ok(),
        }
    }

    /// Set the `JSON_CONFIG_OVERRIDE` blob.
    pub fn with_json_override(mut self, json: impl Into<String>) -> Self {
        self.json_override = Some(json.into());
        self
    }

    /// Set explicit overrides; must be a JSON object.
    pub fn with_overrides(mut self, overrides: Value) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Set the raw value of the `DEBUG` variable.
    pub fn with_debug_env(mut self, value: impl Into<String>) -> Self {
        self.debug_env = Some(value.into());
        self
    }

    /// Set the raw value of the `ROOT_LOG_LEVEL` variable.
    pub fn with_root_log_level(mut self, level: impl Into<String>) -> Self {
        self.root_log_level_env = Some(level.into());
        self
    }

    /// Merge every source, deserialize and validate.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let defaults = serde_json::to_value(AppConfig::default()).map_err(ConfigError::Schema)?;
        let mut merged = match defaults {
            Value::Object(map) => map,
            _ => return Err(ConfigError::NotAnObject("AppConfig")),
        };

        // Empty is treated as unset, like an absent variable.
        if let Some(raw) = self.json_override.as_deref().filter(|s| !s.trim().is_empty()) {
            let value: Value = serde_json::from_str(raw).map_err(ConfigError::Json)?;
            merge_object(&mut merged, value, JSON_CONFIG_OVERRIDE_ENV)?;
        }

        if let Some(value) = self.overrides.clone() {
            merge_object(&mut merged, value, "config overrides")?;
        }

        if self.debug_env.as_deref().is_some_and(|v| !v.is_empty()) {
            merged.insert("DEBUG".into(), Value::Bool(true));
        }
        if let Some(level) = self.root_log_level_env.as_deref().filter(|v| !v.is_empty()) {
            merged.insert("ROOT_LOG_LEVEL".into(), Value::String(level.to_string()));
        }

        let config: AppConfig =
            serde_json::from_value(Value::Object(merged)).map_err(ConfigError::Schema)?;
        validate_config(&config).map_err(ConfigError::Validation)?;

        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }
}

fn merge_object(
    target: &mut Map<String, Value>,
    source: Value,
    name: &'static str,
) -> Result<(), ConfigError> {
    match source {
        Value::Object(map) => {
            target.extend(map);
            Ok(())
        }
        _ => Err(ConfigError::NotAnObject(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_need_a_bucket() {
        let err = ConfigLoader::new().load().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ref e) if *e == vec![ValidationError::MissingBucket]
        ));
    }

    #[test]
    fn test_json_override_applies() {
        let config = ConfigLoader::new()
            .with_json_override(r#"{"S3_BUCKET": "my-bucket", "SEND_FILE_MAX_AGE_DEFAULT": 60}"#)
            .load()
            .unwrap();

        assert_eq!(config.s3_bucket.as_deref(), Some("my-bucket"));
        assert_eq!(config.send_file_max_age_default, 60);
        assert!(!config.debug);
    }

    #[test]
    fn test_explicit_overrides_win_over_json() {
        let config = ConfigLoader::new()
            .with_json_override(r#"{"S3_BUCKET": "from-env", "SERVER_NAME": "localhost:5000"}"#)
            .with_overrides(json!({"S3_BUCKET": "explicit"}))
            .load()
            .unwrap();

        assert_eq!(config.s3_bucket.as_deref(), Some("explicit"));
        assert_eq!(config.server_name.as_deref(), Some("localhost:5000"));
    }

    #[test]
    fn test_env_variables_on_top() {
        let config = ConfigLoader::new()
            .with_overrides(json!({"UNITTEST": true, "DEBUG": false, "ROOT_LOG_LEVEL": "INFO"}))
            .with_debug_env("1")
            .with_root_log_level("warn")
            .load()
            .unwrap();

        assert!(config.debug);
        assert_eq!(config.root_log_level, "warn");
    }

    #[test]
    fn test_empty_debug_env_is_falsy() {
        let config = ConfigLoader::new()
            .with_overrides(json!({"UNITTEST": true}))
            .with_debug_env("")
            .load()
            .unwrap();
        assert!(!config.debug);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = ConfigLoader::new()
            .with_json_override(r#"{"UNITTEST": true, "SOMETHING_ELSE": [1, 2]}"#)
            .load()
            .unwrap();
        assert!(config.unittest);
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = ConfigLoader::new().with_json_override("{not json").load().unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_non_object_rejected() {
        let err = ConfigLoader::new().with_json_override("[1]").load().unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject(JSON_CONFIG_OVERRIDE_ENV)));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let err = ConfigLoader::new()
            .with_overrides(json!({"UNITTEST": true, "REQUEST_TIMEOUT_SECS": "soon"}))
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Schema(_)));
    }
}
