//! Playlist loading errors.

use thiserror::Error;

/// Failure of either loader stage.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The startup playlist file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stage 1: the raw text is not valid JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Stage 2: the JSON does not describe a valid playlist.
    #[error("Invalid playlist: {0}")]
    Invalid(#[from] PlaylistError),
}

/// Semantic problems found while validating a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaylistError {
    #[error("malformed playlist: {0}")]
    Shape(String),

    #[error("playlist has no entries")]
    Empty,

    #[error("module at index {0} has an empty name")]
    UnnamedModule(usize),

    #[error("module {0:?} is defined more than once")]
    DuplicateModule(String),

    #[error("entry {entry} references unknown module {module:?}")]
    UnknownModule { entry: usize, module: String },

    #[error("entry {entry} references unknown collection {collection:?}")]
    UnknownCollection { entry: usize, collection: String },

    #[error("entry {0} must name exactly one of `modules` or `collection`")]
    AmbiguousSource(usize),

    #[error("entry {0} resolves to no modules")]
    NoModules(usize),

    #[error("entry {0} has a zero duration")]
    ZeroDuration(usize),

    #[error("entry {entry} module duration {module_duration}s is outside 1..={duration}s")]
    BadModuleDuration {
        entry: usize,
        module_duration: u64,
        duration: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoadError::from(PlaylistError::UnknownModule {
            entry: 2,
            module: "clock".into(),
        });
        assert_eq!(
            err.to_string(),
            "Invalid playlist: entry 2 references unknown module \"clock\""
        );

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(LoadError::from(parse).to_string().starts_with("Parse error: "));
    }
}
