//! Response policy: security headers, cache directives and access logging.
//!
//! # Responsibilities
//! - Restrict framing (`X-Frame-Options`, `Content-Security-Policy`)
//! - Force `no-store` on non-cacheable methods
//! - Default cacheable responses to a public max-age unless the handler
//!   chose its own `Cache-Control`
//! - Emit one access log line per request
//!
//! # Design Decisions
//! - Runs after the handler, so it sees the handler's headers
//! - Security headers are overwritten unconditionally
//! - Never fails: a request body that cannot be read still produces a
//!   response that goes through the same policy (413 over the size limit,
//!   400 for any other read error)
//! - The request body is logged escaped so the record stays on one line

use std::error::Error as _;

use axum::{
    body::{Body, HttpBody},
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;

use crate::config::AppConfig;
use crate::http::request::{client_addr, request_url};

pub const FRAME_OPTIONS: &str = "SAMEORIGIN";
pub const FRAME_ANCESTORS: &str = "frame-ancestors self";
pub const NO_STORE: &str = "no-store";

/// Methods whose responses may be cached.
pub fn is_cacheable(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

/// Decide the `Cache-Control` value to set.
///
/// Returns `None` when the handler's own directive should be kept.
pub fn cache_directive(
    method: &Method,
    existing: Option<&HeaderValue>,
    max_age: u64,
) -> Option<HeaderValue> {
    if !is_cacheable(method) {
        return Some(HeaderValue::from_static(NO_STORE));
    }
    match existing {
        Some(value) if !value.is_empty() => None,
        _ => HeaderValue::from_str(&format!("public, max-age={max_age}")).ok(),
    }
}

/// Apply the header policy to a response's headers.
pub fn apply_policy(method: &Method, headers: &mut HeaderMap, max_age: u64) {
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static(FRAME_OPTIONS));
    headers.insert(header::CONTENT_SECURITY_POLICY, HeaderValue::from_static(FRAME_ANCESTORS));
    if let Some(value) = cache_directive(method, headers.get(header::CACHE_CONTROL), max_age) {
        headers.insert(header::CACHE_CONTROL, value);
    }
}

/// State for [`response_policy_middleware`].
#[derive(Debug, Clone)]
pub struct ResponsePolicy {
    pub max_age: u64,
    pub max_body_bytes: usize,
    pub server_name: Option<String>,
}

impl ResponsePolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_age: config.send_file_max_age_default,
            max_body_bytes: config.max_body_bytes,
            server_name: config.server_name.clone(),
        }
    }
}

/// 413 when the body exceeded the limit, 400 for any other read failure.
fn body_error_response(err: &axum::Error) -> Response {
    let too_large = err
        .source()
        .is_some_and(|source| source.is::<LengthLimitError>());
    if too_large {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response()
    } else {
        (StatusCode::BAD_REQUEST, "Failed to read request body").into_response()
    }
}

/// Response size for the access log: `Content-Length`, else the body's
/// exact size hint, else 0.
pub fn response_size(response: &Response) -> u64 {
    response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .or_else(|| response.body().size_hint().exact())
        .unwrap_or_default()
}

/// Post-process every response and log it.
pub async fn response_policy_middleware(
    State(policy): State<ResponsePolicy>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let client = client_addr(&request);
    let url = request_url(&request, policy.server_name.as_deref());

    // Buffered so the access log can include it.
    let (parts, body) = request.into_parts();
    let buffered = axum::body::to_bytes(body, policy.max_body_bytes).await;
    let (mut response, body_text) = match buffered {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            let request = Request::from_parts(parts, Body::from(bytes));
            (next.run(request).await, text)
        }
        Err(e) => {
            tracing::warn!(client = %client, error = %e, "Failed to read request body");
            (body_error_response(&e), String::new())
        }
    };

    apply_policy(&method, response.headers_mut(), policy.max_age);
    let size = response_size(&response);

    tracing::info!(
        client = %client,
        method = %method,
        url = %url,
        body = ?body_text,
        status = response.status().as_u16(),
        bytes = size,
        "Request completed"
    );

    response
}
