//! Layout state machine subsystem.
//!
//! # Data Flow
//! ```text
//! control API ──set_playlist / skip_ahead / play_module──▶ LayoutStateMachine
//! scheduler   ──advance_if_due (every tick)─────────────▶ PlaybackEngine
//! control API ◀──playlist / layout / client_state─────── LayoutStateMachine
//! ```
//!
//! # Design Decisions
//! - The control API only sees the [`LayoutStateMachine`] trait
//! - [`PlaybackEngine`] keeps everything in memory
//! - Module-not-found and queue-full are separate [`PlayError`] variants

pub mod engine;
pub mod machine;
pub mod scheduler;
pub mod types;

pub use engine::PlaybackEngine;
pub use machine::LayoutStateMachine;
pub use scheduler::LayoutScheduler;
pub use types::{ClientRect, ClientState, Layout, PlayError};
