//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (startup, secret provisioning, access log)
//!     → logging.rs (filter + fmt layer)
//!     → stdout (CloudWatch under Lambda)
//! ```

pub mod logging;

pub use logging::init_logging;
