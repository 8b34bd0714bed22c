//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, response policy, timeout)
//! - Serve the router on a TCP listener for local development
//!
//! Inside Lambda the same router is driven by [`crate::lambda`] instead of
//! a listener.

use axum::{middleware, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::handlers;
use crate::http::request::InvocationRequestId;
use crate::security::headers::{response_policy_middleware, ResponsePolicy};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

/// Build the application router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: Arc<AppConfig>) -> Router {
    let policy = ResponsePolicy::from_config(&config);
    let timeout = Duration::from_secs(config.request_timeout_secs);

    Router::new()
        .route("/", get(handlers::index))
        .route("/example_json_api", get(handlers::example_json_api))
        .route(
            "/example_json_api_no_cache",
            get(handlers::example_json_api_no_cache),
        )
        .with_state(AppState { config })
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::from_fn_with_state(policy, response_policy_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(InvocationRequestId))
}

/// HTTP server for local development.
pub struct HttpServer {
    router: Router,
    config: Arc<AppConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: Arc<AppConfig>) -> Self {
        let router = build_router(config.clone());
        Self { router, config }
    }

    /// Run the server until the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
