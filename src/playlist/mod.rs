//! Playlist loading subsystem.
//!
//! # Data Flow
//! ```text
//! raw config text (request body or startup file)
//!     → parse_raw_config (stage 1: text → JSON value)
//!     → parse_playlist   (stage 2: JSON value → validated Playlist)
//!     → layout state machine
//! ```
//!
//! The JSON value between the stages is the config snapshot reported by
//! `GET /api/config`; only the layout state machine sees the validated form.

pub mod error;
pub mod loader;
pub mod types;

pub use error::{LoadError, PlaylistError};
pub use loader::{JsonPlaylistLoader, PlaylistLoader, DEFAULT_PLAYLIST};
pub use types::{LayoutSpec, ModuleDef, Playlist, PlaylistEntry, ALL_MODULES};
