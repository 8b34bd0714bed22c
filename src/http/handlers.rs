//! Page and API handlers.

use axum::{
    extract::State,
    http::{header, uri::Authority, HeaderMap},
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::http::request::request_host;
use crate::http::server::AppState;

/// Explicit directive for responses that must never be cached.
pub const NO_CACHE_DIRECTIVE: &str = "no-store, max-age=0";

/// Payload of the example JSON endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiStatus {
    pub body: String,
    pub time: u64,
}

impl ApiStatus {
    pub fn ok() -> Self {
        Self {
            body: "ok".to_string(),
            time: unix_now(),
        }
    }
}

/// Seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// `GET /` — landing page naming the host it was served for.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let server_name = state.config.server_name.as_deref();
    // Only a well-formed authority is echoed into the page.
    let host = Some(request_host(&headers, server_name))
        .filter(|h| h.parse::<Authority>().is_ok())
        .or(server_name)
        .unwrap_or(crate::http::request::FALLBACK_HOST);

    Html(render_index(host, unix_now()))
}

fn render_index(host: &str, time: u64) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><title>{host}</title></head>\n\
         <body>\n\
         <h1>Hi! I am running on {host}</h1>\n\
         <p>Server time: {time}</p>\n\
         </body>\n\
         </html>\n"
    )
}

/// `GET /example_json_api` — cacheable JSON payload.
pub async fn example_json_api() -> Json<ApiStatus> {
    Json(ApiStatus::ok())
}

/// `GET /example_json_api_no_cache` — same payload, never cached.
pub async fn example_json_api_no_cache() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, NO_CACHE_DIRECTIVE)],
        Json(ApiStatus::ok()),
    )
}
