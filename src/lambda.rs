//! Function-invocation adapter.
//!
//! `lambda_http` turns API Gateway events into `http::Request`s; this module
//! fixes up the host header and hands the request to the router.
//!
//! # Design Decisions
//! - CloudFront rewrites `Host` to the API Gateway domain and carries the
//!   viewer's host in `X-Forwarded-Host`; that value is promoted back to
//!   `Host` so pages are rendered for the public name
//! - Handler errors are logged with request context and then returned, so
//!   the runtime records a failed invocation

use axum::http::{header, Request};
use axum::Router;
use lambda_http::Error;
use std::fmt::Display;
use tower::{Service, ServiceExt};

pub const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Promote `X-Forwarded-Host` to `Host`.
///
/// The forwarded header is removed and every previous `Host` value is
/// replaced, so single- and multi-value views agree. Returns the new host.
pub fn patch_forwarded_host<B>(request: &mut Request<B>) -> Option<String> {
    let value = request.headers_mut().remove(X_FORWARDED_HOST)?;
    let host = match value.to_str() {
        Ok(h) if !h.is_empty() => h.to_string(),
        _ => return None,
    };

    request.headers_mut().insert(header::HOST, value);
    tracing::info!(host = %host, "Host header patched from X-Forwarded-Host");
    Some(host)
}

/// Handle one invocation.
pub async fn handle_event<S>(
    service: S,
    mut request: lambda_http::Request,
) -> Result<S::Response, Error>
where
    S: Service<lambda_http::Request>,
    S::Error: Display + Into<Error>,
{
    tracing::debug!(
        method = %request.method(),
        uri = %request.uri(),
        headers = ?request.headers(),
        "Lambda event received"
    );

    patch_forwarded_host(&mut request);

    let method = request.method().clone();
    let uri = request.uri().clone();

    match service.oneshot(request).await {
        Ok(response) => Ok(response),
        Err(e) => {
            tracing::error!(
                method = %method,
                uri = %uri,
                error = %e,
                "Exception handling lambda event"
            );
            Err(e.into())
        }
    }
}

/// Run the router under the Lambda runtime until the runtime stops.
pub async fn run(router: Router) -> Result<(), Error> {
    tracing::info!("Starting Lambda runtime");
    lambda_http::run(lambda_http::service_fn(move |request: lambda_http::Request| {
        handle_event(router.clone(), request)
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::HeaderValue;

    #[test]
    fn test_patch_promotes_forwarded_host() {
        let mut request = Request::builder()
            .header(header::HOST, "abc123.execute-api.us-east-1.amazonaws.com")
            .header(header::HOST, "second.example.com")
            .header(X_FORWARDED_HOST, "example.org")
            .body(Body::empty())
            .unwrap();

        assert_eq!(patch_forwarded_host(&mut request).as_deref(), Some("example.org"));

        let hosts: Vec<&HeaderValue> = request.headers().get_all(header::HOST).iter().collect();
        assert_eq!(hosts, vec![&HeaderValue::from_static("example.org")]);
        assert!(request.headers().get(X_FORWARDED_HOST).is_none());
    }

    #[test]
    fn test_patch_without_forwarded_host() {
        let mut request = Request::builder()
            .header(header::HOST, "api.example.com")
            .body(Body::empty())
            .unwrap();

        assert_eq!(patch_forwarded_host(&mut request), None);
        assert_eq!(request.headers()[header::HOST], "api.example.com");
    }

    #[tokio::test]
    async fn test_service_errors_are_returned() {
        let failing = tower::service_fn(|_req: lambda_http::Request| async {
            Err::<(), Error>("handler blew up".into())
        });
        let request = Request::builder()
            .uri("/")
            .body(lambda_http::Body::Empty)
            .unwrap();

        let err = handle_event(failing, request).await.unwrap_err();
        assert_eq!(err.to_string(), "handler blew up");
    }
}
