//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Cold start (startup.rs):
//!     Load config → Init logging → Provision secret → Freeze config
//!
//! Local server shutdown (shutdown.rs):
//!     Ctrl+C → broadcast → graceful stop
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then logging, then external storage
//! - Under Lambda the runtime decides when the process ends

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{bootstrap, provision_secret, StartupError};
