//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the control
//! server. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the control server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request hardening.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Where the startup playlist comes from.
    pub playlist: PlaylistConfig,

    /// Playback engine tuning.
    pub engine: EngineConfig,

    /// Recent error buffer.
    pub error_log: ErrorLogConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes. Bounds the size of a posted playlist.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Startup playlist source.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PlaylistConfig {
    /// Path to a JSON playlist loaded at startup. The built-in default
    /// playlist is used when unset.
    pub initial_path: Option<String>,
}

/// Playback engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How often the scheduler checks whether the current layout is done.
    pub tick_ms: u64,

    /// Maximum number of explicitly requested modules waiting to play.
    pub max_queue: usize,

    /// Displays registered with the engine at startup.
    pub displays: Vec<DisplayConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            max_queue: 16,
            displays: Vec::new(),
        }
    }
}

/// A display on the wall and its position, in wall pixels.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub id: String,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Recent error buffer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ErrorLogConfig {
    /// Number of error records retained; older records are dropped.
    pub capacity: usize,
}

impl Default for ErrorLogConfig {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}
