//! Error types for cfgsnap operations.
//! Startup errors are fatal; everything raised while watching is logged and survived.

use std::path::PathBuf;

/// All errors that can occur while loading config, registering the watch,
/// or taking a backup.
#[derive(Debug, thiserror::Error)]
pub enum SnapError {
    // ─────────────────────────────────────────────────────────────────────
    // Startup Errors (fatal)
    // ─────────────────────────────────────────────────────────────────────
    #[error("Configuration error: {path}: {details}")]
    Config { path: PathBuf, details: String },

    #[error("Failed to watch {path}: {details}")]
    WatchSetup { path: PathBuf, details: String },

    // ─────────────────────────────────────────────────────────────────────
    // Backup Errors (per attempt)
    // ─────────────────────────────────────────────────────────────────────
    #[error("Failed to read watched file: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create backup directory: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write backup file: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Watcher Errors (runtime)
    // ─────────────────────────────────────────────────────────────────────
    #[error("Watcher error: {0}")]
    WatcherRuntime(String),
}

impl SnapError {
    /// True for errors that should abort the process at startup.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SnapError::Config { .. } | SnapError::WatchSetup { .. })
    }
}

/// Convenience type alias for Results using SnapError.
pub type Result<T> = std::result::Result<T, SnapError>;
