//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging
//! - Provision the session secret (outside unit tests)
//! - Freeze the configuration for sharing
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, including store errors other
//!   than a missing secret object
//! - Runs once per cold start; nothing here is re-entered per request

use std::sync::Arc;
use thiserror::Error;

use crate::config::{AppConfig, ConfigError, ConfigLoader};
use crate::observability::init_logging;
use crate::security::secret::{ensure_secret, SecretError, SecretWriteMode};
use crate::storage::{ObjectStore, S3Store};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("S3_BUCKET is not configured")]
    MissingBucket,

    #[error("failed to provision session secret: {0}")]
    Secret(#[from] SecretError),
}

/// Load configuration, start logging and provision the secret.
///
/// `store` overrides the S3 client used for provisioning.
pub async fn bootstrap(
    loader: &ConfigLoader,
    store: Option<Arc<dyn ObjectStore>>,
) -> Result<Arc<AppConfig>, StartupError> {
    let config = loader.load()?;
    init_logging(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        unittest = config.unittest,
        debug = config.debug,
        server_name = ?config.server_name,
        "serverless-web starting"
    );

    provision_secret(config, store).await
}

/// Fill in `SECRET_KEY` from object storage and freeze the configuration.
pub async fn provision_secret(
    mut config: AppConfig,
    store: Option<Arc<dyn ObjectStore>>,
) -> Result<Arc<AppConfig>, StartupError> {
    if config.unittest {
        tracing::debug!("Unit test mode, skipping secret provisioning");
        return Ok(Arc::new(config));
    }

    let bucket = config
        .s3_bucket
        .clone()
        .ok_or(StartupError::MissingBucket)?;
    let store = match store {
        Some(store) => store,
        None => Arc::new(S3Store::from_env().await),
    };

    let secret = ensure_secret(
        store.as_ref(),
        &bucket,
        &config.secret_object_key,
        SecretWriteMode::CreateIfAbsent,
    )
    .await?;
    config.secret_key = Some(secret);

    Ok(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StoreError};
    use serde_json::json;

    #[tokio::test]
    async fn test_unittest_mode_skips_store() {
        let store = Arc::new(MemoryStore::new());
        let config = provision_secret(AppConfig::for_tests(), Some(store.clone()))
            .await
            .unwrap();

        assert!(config.secret_key.is_none());
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_bootstrap_provisions_secret() {
        let store = Arc::new(MemoryStore::new());
        let loader = ConfigLoader::new().with_json_override(r#"{"S3_BUCKET": "app-bucket"}"#);

        let config = bootstrap(&loader, Some(store.clone())).await.unwrap();

        let secret = config.secret_key.as_deref().unwrap();
        assert_eq!(store.get("app-bucket", "SECRET_KEY").await.unwrap(), secret.as_bytes());
    }

    #[tokio::test]
    async fn test_bootstrap_reuses_existing_secret() {
        let store = Arc::new(MemoryStore::new().with_object("app-bucket", "custom-key", "s3cr3t"));
        let loader = ConfigLoader::new()
            .with_overrides(json!({"S3_BUCKET": "app-bucket", "SECRET_OBJECT_KEY": "custom-key"}));

        let config = bootstrap(&loader, Some(store.clone())).await.unwrap();

        assert_eq!(config.secret_key.as_deref(), Some("s3cr3t"));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_bootstrap_rejects_invalid_config() {
        let err = bootstrap(&ConfigLoader::new(), Some(Arc::new(MemoryStore::new())))
            .await
            .unwrap_err();
        assert!(matches!(err, StartupError::Config(_)));
    }

    #[test]
    fn test_store_errors_surface_in_message() {
        let err = StartupError::from(SecretError::from(StoreError::Backend("AccessDenied".into())));
        assert!(err.to_string().contains("AccessDenied"));
    }
}
