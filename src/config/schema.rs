//! Configuration schema definitions.
//!
//! Keys use the `SCREAMING_SNAKE_CASE` spelling of the deployment
//! environment (`{"S3_BUCKET": "...", "DEBUG": false}`), so the JSON blob in
//! `JSON_CONFIG_OVERRIDE` deserializes straight into [`AppConfig`].

use serde::{Deserialize, Serialize};

/// Object key under which the session secret is stored.
pub const DEFAULT_SECRET_OBJECT_KEY: &str = "SECRET_KEY";

/// Default public cache lifetime for cacheable responses, in seconds.
pub const DEFAULT_CACHE_DURATION: u64 = 300;

/// Root configuration for the application.
///
/// Built once at startup by [`ConfigLoader`](crate::config::ConfigLoader)
/// and shared read-only afterwards.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AppConfig {
    /// Bucket holding the session secret.
    pub s3_bucket: Option<String>,

    /// Session signing secret. Filled in by the secret provisioner at cold
    /// start; held for session signing, which this service does not do
    /// itself.
    pub secret_key: Option<String>,

    /// Object key of the secret inside `s3_bucket`.
    pub secret_object_key: String,

    /// Raise the application log level to debug.
    pub debug: bool,

    /// Test mode: no secret provisioning against external storage.
    pub unittest: bool,

    /// Host name used when a request carries no `Host` header.
    pub server_name: Option<String>,

    /// Base log level applied to every crate.
    pub root_log_level: String,

    /// Pass-through deployment key: accepted and typed so a deployment blob
    /// validates, but nothing in this service reads it.
    pub session_cookie_secure: bool,

    /// Pass-through deployment key, like `session_cookie_secure`.
    pub templates_auto_reload: bool,

    /// Default `max-age` for cacheable responses (seconds).
    pub send_file_max_age_default: u64,

    /// Session lifetime (seconds). Pass-through deployment key, like
    /// `session_cookie_secure`.
    pub permanent_session_lifetime: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            s3_bucket: None,
            secret_key: None,
            secret_object_key: DEFAULT_SECRET_OBJECT_KEY.to_string(),
            debug: false,
            unittest: false,
            server_name: None,
            root_log_level: "info".to_string(),
            session_cookie_secure: true,
            templates_auto_reload: false,
            send_file_max_age_default: DEFAULT_CACHE_DURATION,
            permanent_session_lifetime: 86_400,
            request_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Configuration for in-process tests: no bucket, no provisioning.
    pub fn for_tests() -> Self {
        Self {
            unittest: true,
            server_name: Some("unittest.example.com".to_string()),
            ..Self::default()
        }
    }

    /// Effective application log level.
    pub fn app_log_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.root_log_level
        }
    }
}
