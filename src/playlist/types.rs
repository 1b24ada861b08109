//! Validated playlist types.

use serde::{Deserialize, Serialize};

/// Collection name that expands to every defined module.
pub const ALL_MODULES: &str = "__ALL__";

/// A validated playlist: the module catalogue plus the ordered layouts to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub modules: Vec<ModuleDef>,
    pub entries: Vec<PlaylistEntry>,
}

impl Playlist {
    /// Look up a module definition by name.
    pub fn module(&self, name: &str) -> Option<&ModuleDef> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A named unit of playback content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub config: serde_json::Value,
}

/// One step of the playlist: a layout and the modules it rotates through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub layout: LayoutSpec,
    /// Resolved module names, in rotation order.
    pub modules: Vec<String>,
}

/// How an entry is arranged and how long it runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSpec {
    pub name: String,
    /// Seconds the entry stays on screen.
    pub duration: u64,
    /// Seconds between shifts of the module rotation across displays, when
    /// set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_duration: Option<u64>,
}
