//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Cold start:
//!     → secret.rs (get-or-create the session secret in object storage)
//!
//! Every response:
//!     → headers.rs (frame policy, cache directive, access log)
//!     → Send to client
//! ```

pub mod headers;
pub mod secret;

pub use headers::{apply_policy, cache_directive, response_policy_middleware, ResponsePolicy};
pub use secret::{ensure_secret, generate_token, SecretError, SecretWriteMode};
