//! Shared fixtures for integration tests.

use axum::body::Body;
use axum::http::Response;
use axum::Router;
use serde_json::json;
use std::sync::Arc;

use serverless_web::config::{AppConfig, ConfigLoader};
use serverless_web::http::build_router;

/// Configuration used by every router test: unit test mode on a fixed host.
pub fn test_config() -> Arc<AppConfig> {
    let config = ConfigLoader::new()
        .with_overrides(json!({
            "DEBUG": false,
            "UNITTEST": true,
            "SEND_FILE_MAX_AGE_DEFAULT": 300,
            "PERMANENT_SESSION_LIFETIME": 86400,
            "SERVER_NAME": "unittest.example.com",
        }))
        .load()
        .expect("test config must be valid");
    Arc::new(config)
}

#[allow(dead_code)]
/// Router built from [`test_config`].
pub fn test_app() -> Router {
    build_router(test_config())
}

#[allow(dead_code)]
/// Collect a response body as UTF-8 text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body must be readable");
    String::from_utf8(bytes.to_vec()).expect("body must be UTF-8")
}
