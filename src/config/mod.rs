//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → handed to the subsystems at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//!
//! This is the server's own configuration. The playlist that the control
//! API replaces at runtime lives in [`crate::playlist`].

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ServerConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::EngineConfig;
pub use schema::DisplayConfig;
