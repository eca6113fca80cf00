//! Crate-wide error type.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong outside of pure UI state changes.
///
/// Screens never produce these; they surface from the store, from startup
/// (data directory, config file) or from the terminal itself.
#[derive(Debug, Error)]
pub enum KanbanError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("task not found: {0}")]
    TaskNotFound(i64),

    #[error("project not found: {0}")]
    ProjectNotFound(i64),

    #[error("could not determine a data directory")]
    NoDataDir,

    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KanbanError>;
