//! Two-stage playlist loading.
//!
//! Stage 1 turns raw text into an intermediate JSON value. Stage 2 checks the
//! intermediate value and resolves it into a [`Playlist`]. The intermediate
//! value is what the control API stores and reports as a config snapshot.

use serde::Deserialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::playlist::error::{LoadError, PlaylistError};
use crate::playlist::types::{LayoutSpec, ModuleDef, Playlist, PlaylistEntry, ALL_MODULES};

/// Playlist used when no startup file is configured.
pub const DEFAULT_PLAYLIST: &str = r#"{
  "modules": [
    { "name": "solid", "path": "modules/solid", "config": { "color": "black" } }
  ],
  "playlist": [
    { "layout": { "name": "fullscreen", "duration": 600 }, "modules": ["solid"] }
  ]
}"#;

/// Parses configuration text into playlists.
pub trait PlaylistLoader: Send + Sync {
    /// Stage 1: raw text to the intermediate structure.
    fn parse_raw_config(&self, text: &str) -> Result<Value, LoadError>;

    /// Stage 2: intermediate structure to a validated playlist.
    fn parse_playlist(&self, config: &Value) -> Result<Playlist, LoadError>;

    /// The intermediate structure that was loaded at startup.
    fn initial_config(&self) -> Value;
}

/// Loader for the JSON playlist format.
#[derive(Debug, Clone)]
pub struct JsonPlaylistLoader {
    initial: Value,
}

impl JsonPlaylistLoader {
    /// Create a loader whose startup configuration is `initial`.
    ///
    /// The value is validated so a broken startup playlist fails fast.
    pub fn new(initial: Value) -> Result<Self, LoadError> {
        validate(&initial)?;
        Ok(Self { initial })
    }

    /// Create a loader backed by [`DEFAULT_PLAYLIST`].
    pub fn with_default_playlist() -> Result<Self, LoadError> {
        Self::new(serde_json::from_str(DEFAULT_PLAYLIST)?)
    }

    /// Create a loader whose startup configuration is read from `path`.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path)?;
        Self::new(serde_json::from_str(&text)?)
    }
}

impl PlaylistLoader for JsonPlaylistLoader {
    fn parse_raw_config(&self, text: &str) -> Result<Value, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    fn parse_playlist(&self, config: &Value) -> Result<Playlist, LoadError> {
        Ok(validate(config)?)
    }

    fn initial_config(&self) -> Value {
        self.initial.clone()
    }
}

#[derive(Deserialize)]
struct RawPlaylist {
    #[serde(default)]
    modules: Vec<RawModule>,
    #[serde(default)]
    collections: HashMap<String, Vec<String>>,
    #[serde(default)]
    playlist: Vec<RawEntry>,
}

#[derive(Deserialize)]
struct RawModule {
    name: String,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    config: Value,
}

#[derive(Deserialize)]
struct RawEntry {
    layout: LayoutSpec,
    #[serde(default)]
    modules: Option<Vec<String>>,
    #[serde(default)]
    collection: Option<String>,
}

fn validate(config: &Value) -> Result<Playlist, PlaylistError> {
    let raw: RawPlaylist = serde_json::from_value(config.clone())
        .map_err(|e| PlaylistError::Shape(e.to_string()))?;

    if raw.playlist.is_empty() {
        return Err(PlaylistError::Empty);
    }

    let mut seen = HashSet::new();
    for (i, module) in raw.modules.iter().enumerate() {
        if module.name.trim().is_empty() {
            return Err(PlaylistError::UnnamedModule(i));
        }
        if !seen.insert(module.name.as_str()) {
            return Err(PlaylistError::DuplicateModule(module.name.clone()));
        }
    }

    let mut entries = Vec::with_capacity(raw.playlist.len());
    for (i, entry) in raw.playlist.iter().enumerate() {
        let layout = &entry.layout;
        if layout.duration == 0 {
            return Err(PlaylistError::ZeroDuration(i));
        }
        if let Some(module_duration) = layout.module_duration {
            if module_duration == 0 || module_duration > layout.duration {
                return Err(PlaylistError::BadModuleDuration {
                    entry: i,
                    module_duration,
                    duration: layout.duration,
                });
            }
        }

        let modules: Vec<String> = match (&entry.modules, &entry.collection) {
            (Some(names), None) => names.clone(),
            (None, Some(name)) if name == ALL_MODULES => {
                raw.modules.iter().map(|m| m.name.clone()).collect()
            }
            (None, Some(name)) => raw
                .collections
                .get(name)
                .cloned()
                .ok_or_else(|| PlaylistError::UnknownCollection {
                    entry: i,
                    collection: name.clone(),
                })?,
            _ => return Err(PlaylistError::AmbiguousSource(i)),
        };

        if modules.is_empty() {
            return Err(PlaylistError::NoModules(i));
        }
        if let Some(unknown) = modules.iter().find(|m| !seen.contains(m.as_str())) {
            return Err(PlaylistError::UnknownModule {
                entry: i,
                module: unknown.clone(),
            });
        }

        entries.push(PlaylistEntry {
            layout: layout.clone(),
            modules,
        });
    }

    let modules = raw
        .modules
        .into_iter()
        .map(|m| ModuleDef {
            name: m.name,
            path: m.path,
            config: m.config,
        })
        .collect();

    Ok(Playlist { modules, entries })
}
