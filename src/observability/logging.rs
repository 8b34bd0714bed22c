//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Derive the filter from `ROOT_LOG_LEVEL` and `DEBUG`
//!
//! # Design Decisions
//! - `RUST_LOG` always wins when set
//! - No ANSI colors under Lambda; CloudWatch shows escape codes verbatim

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;

/// Set by the Lambda runtime in every execution environment.
pub const LAMBDA_FUNCTION_NAME_ENV: &str = "AWS_LAMBDA_FUNCTION_NAME";

/// Filter directive for a configuration, e.g. `info,serverless_web=debug`.
pub fn filter_directive(config: &AppConfig) -> String {
    format!(
        "{},{}={}",
        config.root_log_level.to_ascii_lowercase(),
        env!("CARGO_CRATE_NAME"),
        config.app_log_level().to_ascii_lowercase()
    )
}

/// True when running inside a Lambda execution environment.
pub fn running_in_lambda() -> bool {
    std::env::var_os(LAMBDA_FUNCTION_NAME_ENV).is_some()
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(!running_in_lambda()))
        .try_init();

    if installed.is_ok() {
        tracing::debug!(filter = %filter_directive(config), "Logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        let mut config = AppConfig {
            root_log_level: "INFO".into(),
            ..AppConfig::default()
        };
        assert_eq!(filter_directive(&config), "info,serverless_web=info");

        config.debug = true;
        assert_eq!(filter_directive(&config), "info,serverless_web=debug");
    }
}
