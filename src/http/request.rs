//! Request inspection helpers.
//!
//! # Responsibilities
//! - Resolve the effective host (Host header, then configured server name)
//! - Resolve the client address (X-Forwarded-For, then socket peer)
//! - Rebuild the absolute request URL for access logging
//! - Generate the request ID (Lambda invocation ID, else UUID v4)
//!
//! # Design Decisions
//! - Behind API Gateway and CloudFront the socket peer is meaningless, so
//!   the first X-Forwarded-For entry is preferred
//! - Helpers never fail; missing information degrades to placeholders

use axum::extract::ConnectInfo;
use axum::http::{header, HeaderMap, HeaderValue, Request};
use std::net::SocketAddr;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Host used when neither the request nor the configuration names one.
pub const FALLBACK_HOST: &str = "localhost";

/// Effective host of a request.
pub fn request_host<'a>(headers: &'a HeaderMap, server_name: Option<&'a str>) -> &'a str {
    headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty())
        .or(server_name)
        .unwrap_or(FALLBACK_HOST)
}

/// Best-effort client address for logging.
pub fn client_addr<B>(request: &Request<B>) -> String {
    let forwarded = request
        .headers()
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(addr) = forwarded {
        return addr.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Absolute URL of a request, e.g. `https://example.org/path?q=1`.
pub fn request_url<B>(request: &Request<B>, server_name: Option<&str>) -> String {
    let headers = request.headers();
    let scheme = headers
        .get(X_FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    format!("{}://{}{}", scheme, request_host(headers, server_name), path)
}

/// Request ID source for `SetRequestIdLayer`.
///
/// Inside Lambda the invocation ID is reused so log lines can be joined
/// with the runtime's own records.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvocationRequestId;

impl MakeRequestId for InvocationRequestId {
    fn make_request_id<B>(&mut self, request: &Request<B>) -> Option<RequestId> {
        let id = request
            .extensions()
            .get::<lambda_http::Context>()
            .map(|ctx| ctx.request_id.clone())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_host_prefers_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_host(&headers, None), FALLBACK_HOST);
        assert_eq!(request_host(&headers, Some("unittest.example.com")), "unittest.example.com");

        headers.insert(header::HOST, "example.org".parse().unwrap());
        assert_eq!(request_host(&headers, Some("unittest.example.com")), "example.org");
    }

    #[test]
    fn test_client_addr_uses_first_forwarded_entry() {
        let request = Request::builder()
            .header(X_FORWARDED_FOR, "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_addr(&request), "203.0.113.7");
    }

    #[test]
    fn test_client_addr_falls_back_to_peer() {
        let mut request = Request::new(Body::empty());
        assert_eq!(client_addr(&request), "-");

        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));
        assert_eq!(client_addr(&request), "127.0.0.1");
    }

    #[test]
    fn test_request_url() {
        let request = Request::builder()
            .uri("/example_json_api?x=1")
            .header(header::HOST, "example.org")
            .header(X_FORWARDED_PROTO, "https")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_url(&request, None), "https://example.org/example_json_api?x=1");
    }

    #[test]
    fn test_request_id_is_uuid_outside_lambda() {
        let request = Request::new(Body::empty());
        let id = InvocationRequestId.make_request_id(&request).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }
}
