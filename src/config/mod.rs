//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → config file (TOML, optional)
//!     → HEALTH_CHECK_* environment variables
//!     → --port flag
//!     → validation.rs (semantic checks)
//!     → AggregatorConfig (validated, immutable)
//!     → shared via Arc with the dispatcher and server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; it is never re-read per request
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AggregatorConfig;
pub use schema::BackendConfig;
pub use schema::ListenerConfig;
pub use schema::{LogFormat, ObservabilityConfig};
pub use validation::ValidationError;
