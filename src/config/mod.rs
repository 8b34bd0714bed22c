//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! AppConfig::default()
//!     → JSON_CONFIG_OVERRIDE (env, JSON object)
//!     → explicit overrides (tests, CLI)
//!     → DEBUG / ROOT_LOG_LEVEL (env)
//!     → loader.rs (merge & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc with every handler
//! ```
//!
//! # Design Decisions
//! - Config is immutable once startup finishes
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use schema::AppConfig;
pub use validation::{validate_config, ValidationError};
