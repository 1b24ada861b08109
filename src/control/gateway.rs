//! The control gateway: config snapshots plus pass-through to collaborators.
//!
//! # Responsibilities
//! - Hold the initial and current config snapshots
//! - Run the two-stage parse and apply a new playlist atomically
//! - Validate request parameters before any collaborator call
//!
//! # Design Decisions
//! - Snapshot replacement and `set_playlist` happen under one write lock;
//!   readers of the config or playlist take the read lock
//! - Parsing happens before the lock is taken, so a slow parse never blocks
//!   readers
//! - Loader errors become [`ApiError`]s and are not logged here

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::control::error::ApiError;
use crate::layout::{ClientState, Layout, LayoutStateMachine};
use crate::observability::metrics;
use crate::observability::{ErrorLog, ErrorRecord};
use crate::playlist::{Playlist, PlaylistLoader};

/// The two config snapshots, in their intermediate (pre-validation) form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshots {
    /// Configuration loaded at startup. Never replaced.
    pub initial: Value,
    /// Configuration of the running playlist.
    pub current: Value,
}

/// Dispatches control requests to the loader, the state machine and the
/// error log.
pub struct ControlGateway {
    loader: Arc<dyn PlaylistLoader>,
    machine: Arc<dyn LayoutStateMachine>,
    errors: Arc<dyn ErrorLog>,
    snapshots: RwLock<ConfigSnapshots>,
}

impl ControlGateway {
    /// Create a gateway whose snapshots both start as the loader's initial
    /// configuration.
    pub fn new(
        loader: Arc<dyn PlaylistLoader>,
        machine: Arc<dyn LayoutStateMachine>,
        errors: Arc<dyn ErrorLog>,
    ) -> Self {
        let initial = loader.initial_config();
        Self {
            loader,
            machine,
            errors,
            snapshots: RwLock::new(ConfigSnapshots {
                current: initial.clone(),
                initial,
            }),
        }
    }

    pub async fn playlist(&self) -> Playlist {
        let _snapshots = self.snapshots.read().await;
        self.machine.playlist()
    }

    pub async fn config(&self) -> ConfigSnapshots {
        self.snapshots.read().await.clone()
    }

    /// Current snapshot and running playlist, read under one guard.
    #[cfg(test)]
    async fn current_with_playlist(&self) -> (Value, Playlist) {
        let snapshots = self.snapshots.read().await;
        (snapshots.current.clone(), self.machine.playlist())
    }

    pub fn recent_errors(&self) -> Vec<ErrorRecord> {
        self.errors.recent_errors()
    }

    /// Parse `text` and, only if both stages succeed, make it the running
    /// playlist and the current snapshot.
    pub async fn apply_config(&self, text: &str) -> Result<(), ApiError> {
        let parsed = self
            .loader
            .parse_raw_config(text)
            .and_then(|config| {
                let playlist = self.loader.parse_playlist(&config)?;
                Ok((config, playlist))
            });

        let (config, playlist) = match parsed {
            Ok(parsed) => parsed,
            Err(e) => {
                metrics::record_config_update(false);
                return Err(ApiError::BadConfig(e));
            }
        };

        let entries = playlist.entries.len();
        {
            let mut snapshots = self.snapshots.write().await;
            self.machine.set_playlist(playlist);
            snapshots.current = config;
        }

        metrics::record_config_update(true);
        tracing::info!(entries, "Configuration replaced");
        Ok(())
    }

    pub fn layout(&self) -> Layout {
        self.machine.layout()
    }

    pub fn client_state(&self) -> BTreeMap<String, ClientState> {
        self.machine.client_state()
    }

    /// Advance to the next layout. Whether the machine advanced is not
    /// reported to the caller.
    pub fn skip(&self) {
        let _ = self.machine.skip_ahead();
    }

    /// Queue a module by name. `None` and empty names are rejected before the
    /// state machine is consulted.
    pub async fn play(&self, module: Option<&str>) -> Result<(), ApiError> {
        let name = module
            .filter(|m| !m.is_empty())
            .ok_or(ApiError::MissingModule)?;

        let _snapshots = self.snapshots.read().await;
        self.machine.play_module(name).map_err(|e| {
            tracing::debug!(module = name, reason = %e, "Play request rejected");
            ApiError::PlayRejected(e)
        })
    }
}
