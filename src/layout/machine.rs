//! Interface to the layout state machine.

use std::collections::BTreeMap;

use crate::layout::types::{ClientState, Layout, PlayError};
use crate::playlist::Playlist;

/// Owns the running playlist, the current layout, the connected clients and
/// the playback cursor.
///
/// Implementations serialize their own commands; callers may share one
/// instance across request handlers.
pub trait LayoutStateMachine: Send + Sync {
    /// Replace the running playlist and restart from its first entry.
    fn set_playlist(&self, playlist: Playlist);

    fn playlist(&self) -> Playlist;

    fn layout(&self) -> Layout;

    /// Per-client state keyed by client id.
    fn client_state(&self) -> BTreeMap<String, ClientState>;

    /// Advance to the next playlist entry. Returns false when there is
    /// nothing to advance to.
    fn skip_ahead(&self) -> bool;

    /// Queue `name` to play on the next layout change.
    fn play_module(&self, name: &str) -> Result<(), PlayError>;
}
