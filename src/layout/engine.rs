//! In-process playback engine.
//!
//! # Responsibilities
//! - Walk the playlist entries in order, wrapping at the end
//! - Hold explicitly requested modules until the next layout change
//! - Assign the rotation's modules to connected clients
//! - Shift the rotation by one module every `moduleDuration` seconds
//!
//! # Design Decisions
//! - Playback state behind one `RwLock`; clients in a `DashMap`
//! - Lock order is always state, then clients
//! - Time is passed in so advancing is testable without sleeping

use dashmap::DashMap;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use crate::layout::machine::LayoutStateMachine;
use crate::layout::types::{ClientRect, ClientState, Layout, PlayError};
use crate::playlist::Playlist;

struct EngineState {
    playlist: Playlist,
    cursor: usize,
    started_at: Instant,
    rotated_at: Instant,
    /// Modules on screen for the current entry, first display first.
    rotation: Vec<String>,
    queue: VecDeque<String>,
}

impl EngineState {
    fn new(playlist: Playlist, now: Instant) -> Self {
        let rotation = playlist
            .entries
            .first()
            .map(|e| e.modules.clone())
            .unwrap_or_default();
        Self {
            playlist,
            cursor: 0,
            started_at: now,
            rotated_at: now,
            rotation,
            queue: VecDeque::new(),
        }
    }

    /// Layout duration and module duration of the current entry.
    fn timings(&self) -> Option<(Duration, Option<Duration>)> {
        self.playlist.entries.get(self.cursor).map(|e| {
            (
                Duration::from_secs(e.layout.duration),
                e.layout.module_duration.map(Duration::from_secs),
            )
        })
    }

    fn advance(&mut self, now: Instant) -> bool {
        if self.playlist.is_empty() {
            return false;
        }
        self.cursor = (self.cursor + 1) % self.playlist.entries.len();
        self.started_at = now;
        self.rotated_at = now;
        self.rotation = match self.queue.pop_front() {
            Some(requested) => vec![requested],
            None => self.playlist.entries[self.cursor].modules.clone(),
        };
        true
    }
}

/// Reference [`LayoutStateMachine`] that keeps everything in memory.
pub struct PlaybackEngine {
    state: RwLock<EngineState>,
    clients: DashMap<String, ClientState>,
    max_queue: usize,
}

impl PlaybackEngine {
    /// Create an engine playing `playlist` from its first entry.
    pub fn new(playlist: Playlist, max_queue: usize) -> Self {
        Self {
            state: RwLock::new(EngineState::new(playlist, Instant::now())),
            clients: DashMap::new(),
            max_queue,
        }
    }

    /// Register (or move) a display and give it a module from the rotation.
    pub fn register_client(&self, id: impl Into<String>, rect: ClientRect) {
        let state = self.read();
        self.clients.insert(id.into(), ClientState { rect, module: None });
        self.assign_clients(&state.rotation);
    }

    /// Advance if the current entry has been on screen for its full duration.
    /// Otherwise shift the rotation when the module duration has elapsed.
    ///
    /// Returns true only when the layout changed.
    pub fn advance_if_due(&self, now: Instant) -> bool {
        let mut state = self.write();
        let Some((duration, module_duration)) = state.timings() else {
            return false;
        };

        if now.saturating_duration_since(state.started_at) >= duration {
            let advanced = state.advance(now);
            if advanced {
                tracing::debug!(index = state.cursor, "Layout duration elapsed, advancing");
                self.assign_clients(&state.rotation);
            }
            return advanced;
        }

        if let Some(module_duration) = module_duration {
            if state.rotation.len() > 1
                && now.saturating_duration_since(state.rotated_at) >= module_duration
            {
                state.rotation.rotate_left(1);
                state.rotated_at = now;
                tracing::debug!(first = %state.rotation[0], "Module duration elapsed, rotating");
                self.assign_clients(&state.rotation);
            }
        }
        false
    }

    fn assign_clients(&self, rotation: &[String]) {
        let mut ids: Vec<String> = self.clients.iter().map(|c| c.key().clone()).collect();
        ids.sort();
        for (i, id) in ids.iter().enumerate() {
            if let Some(mut client) = self.clients.get_mut(id) {
                client.module = if rotation.is_empty() {
                    None
                } else {
                    Some(rotation[i % rotation.len()].clone())
                };
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LayoutStateMachine for PlaybackEngine {
    fn set_playlist(&self, playlist: Playlist) {
        let mut state = self.write();
        *state = EngineState::new(playlist, Instant::now());
        tracing::info!(entries = state.playlist.entries.len(), "Playlist replaced");
        self.assign_clients(&state.rotation);
    }

    fn playlist(&self) -> Playlist {
        self.read().playlist.clone()
    }

    fn layout(&self) -> Layout {
        let state = self.read();
        let entry = state.playlist.entries.get(state.cursor);
        Layout {
            index: state.cursor,
            name: entry.map(|e| e.layout.name.clone()).unwrap_or_default(),
            duration: entry.map(|e| e.layout.duration).unwrap_or_default(),
            module_duration: entry.and_then(|e| e.layout.module_duration),
            modules: state.rotation.clone(),
            elapsed_secs: state.started_at.elapsed().as_secs(),
            queued: state.queue.iter().cloned().collect(),
        }
    }

    fn client_state(&self) -> BTreeMap<String, ClientState> {
        self.clients
            .iter()
            .map(|c| (c.key().clone(), c.value().clone()))
            .collect()
    }

    fn skip_ahead(&self) -> bool {
        let mut state = self.write();
        let advanced = state.advance(Instant::now());
        if advanced {
            self.assign_clients(&state.rotation);
        }
        advanced
    }

    fn play_module(&self, name: &str) -> Result<(), PlayError> {
        let mut state = self.write();
        if state.playlist.module(name).is_none() {
            return Err(PlayError::ModuleNotFound(name.to_string()));
        }
        if state.queue.len() >= self.max_queue {
            return Err(PlayError::QueueFull {
                capacity: self.max_queue,
            });
        }
        state.queue.push_back(name.to_string());
        Ok(())
    }
}
