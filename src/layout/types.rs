//! Layout, client and command types reported by the state machine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The arrangement currently on the wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Index of the playlist entry being played.
    pub index: usize,
    pub name: String,
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_duration: Option<u64>,
    /// Modules in rotation for this layout.
    pub modules: Vec<String>,
    pub elapsed_secs: u64,
    /// Explicitly requested modules waiting for the next layout.
    pub queued: Vec<String>,
}

/// Position of a display on the wall, in wall pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Status of one connected display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientState {
    pub rect: ClientRect,
    /// Module assigned to this display, if any is playing.
    pub module: Option<String>,
}

/// Reasons the state machine refuses to play a module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("module {0:?} is not defined in the current playlist")]
    ModuleNotFound(String),

    #[error("play queue is full ({capacity} pending)")]
    QueueFull { capacity: usize },
}
