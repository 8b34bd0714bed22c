//! Serverless web application library.
//!
//! An axum application packaged for AWS Lambda: a landing page and two
//! example JSON endpoints behind a fixed response policy, with the session
//! secret provisioned from S3 on cold start.

pub mod config;
pub mod http;
pub mod lambda;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod storage;

pub use config::AppConfig;
pub use http::{build_router, HttpServer};
pub use lifecycle::Shutdown;
