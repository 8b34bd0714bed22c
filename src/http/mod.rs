//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Lambda event (lambda.rs) or TCP connection (server.rs)
//!     → request ID, trace span
//!     → response policy (security::headers)
//!     → timeout
//!     → handlers.rs (page, JSON API)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use server::{build_router, AppState, HttpServer};
