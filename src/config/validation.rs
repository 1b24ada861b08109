//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, capacities > 0)
//! - Validate addresses parse before anything binds to them
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("unknown log level {0:?}")]
    UnknownLogLevel(String),

    #[error("playlist.initial_path must not be empty")]
    EmptyPlaylistPath,

    #[error("engine.displays: display id must not be empty")]
    EmptyDisplayId,

    #[error("engine.displays: duplicate display id {0:?}")]
    DuplicateDisplay(String),
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }
    if config.engine.tick_ms == 0 {
        errors.push(ValidationError::Zero("engine.tick_ms"));
    }
    if config.engine.max_queue == 0 {
        errors.push(ValidationError::Zero("engine.max_queue"));
    }
    if config.error_log.capacity == 0 {
        errors.push(ValidationError::Zero("error_log.capacity"));
    }

    if matches!(config.playlist.initial_path.as_deref(), Some(p) if p.trim().is_empty()) {
        errors.push(ValidationError::EmptyPlaylistPath);
    }

    let mut display_ids = HashSet::new();
    for display in &config.engine.displays {
        if display.id.trim().is_empty() {
            errors.push(ValidationError::EmptyDisplayId);
        } else if !display_ids.insert(display.id.as_str()) {
            errors.push(ValidationError::DuplicateDisplay(display.id.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DisplayConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ServerConfig::default()), Ok(()));
    }

    #[test]
    fn test_reports_all_errors() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.error_log.capacity = 0;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero("timeouts.request_secs")));
        assert!(errors.contains(&ValidationError::Zero("error_log.capacity")));
        assert!(errors.contains(&ValidationError::UnknownLogLevel("loud".into())));
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = ServerConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidAddress {
                field: "observability.metrics_address",
                value: "nope".into(),
            }]
        );
    }

    #[test]
    fn test_display_ids_must_be_unique() {
        let display = |id: &str| DisplayConfig {
            id: id.into(),
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
        };
        let mut config = ServerConfig::default();
        config.engine.displays = vec![display("left"), display(""), display("left")];

        assert_eq!(
            validate_config(&config),
            Err(vec![
                ValidationError::EmptyDisplayId,
                ValidationError::DuplicateDisplay("left".into()),
            ])
        );
    }

    #[test]
    fn test_blank_playlist_path_rejected() {
        let mut config = ServerConfig::default();
        config.playlist.initial_path = Some("  ".into());
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::EmptyPlaylistPath])
        );
    }
}
