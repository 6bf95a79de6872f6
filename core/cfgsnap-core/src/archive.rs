//! Backup of the watched file into a year-partitioned tree.
//!
//! # Layout
//!
//! ```text
//! {backup_root}/
//! └── 2024/
//!     ├── 20240305_101500.yml
//!     └── 20240305_114210.yml
//! ```
//!
//! Artifacts are named by local time at second resolution. A backup is only
//! written when the file's fingerprint differs from the last one persisted, and
//! the stored fingerprint only moves after the artifact write succeeds, so a
//! failed attempt is never mistaken for a duplicate on the next try. Existing
//! artifacts are never overwritten: if new content lands in the same second as
//! the previous artifact, the attempt fails and the next write retries it.

use chrono::{DateTime, Local};
use fs_err as fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, SnapError};
use crate::fingerprint::Fingerprint;

pub const ARTIFACT_EXTENSION: &str = "yml";

pub type Clock = Box<dyn Fn() -> DateTime<Local> + Send>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// Content matches the last successful backup.
    Unchanged { fingerprint: Fingerprint },
    Written {
        path: PathBuf,
        fingerprint: Fingerprint,
    },
}

pub struct Archiver {
    source: PathBuf,
    backup_root: PathBuf,
    last_fingerprint: Option<Fingerprint>,
    clock: Clock,
}

impl Archiver {
    pub fn new(source: impl Into<PathBuf>, backup_root: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            backup_root: backup_root.into(),
            last_fingerprint: None,
            clock: Box::new(Local::now),
        }
    }

    /// Replaces the timestamp source used for artifact names.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Local> + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn last_fingerprint(&self) -> Option<Fingerprint> {
        self.last_fingerprint
    }

    pub fn backup(&mut self) -> Result<BackupOutcome> {
        let now = (self.clock)();
        self.backup_at(now)
    }

    /// Runs one backup attempt as if the current time were `now`.
    pub fn backup_at(&mut self, now: DateTime<Local>) -> Result<BackupOutcome> {
        let data = fs::read(&self.source).map_err(|source| SnapError::Read {
            path: self.source.clone(),
            source,
        })?;

        let fingerprint = Fingerprint::of(&data);
        if self.last_fingerprint == Some(fingerprint) {
            return Ok(BackupOutcome::Unchanged { fingerprint });
        }

        let path = artifact_path(&self.backup_root, now);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| SnapError::Directory {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        // Artifacts are never replaced; a same-second name clash fails the attempt.
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .and_then(|mut file| file.write_all(&data))
            .map_err(|source| SnapError::Write {
                path: path.clone(),
                source,
            })?;

        self.last_fingerprint = Some(fingerprint);
        Ok(BackupOutcome::Written { path, fingerprint })
    }
}

/// `{root}/{YYYY}/{YYYYMMDD_HHMMSS}.yml` for the given instant.
pub fn artifact_path(root: &Path, now: DateTime<Local>) -> PathBuf {
    root.join(now.format("%Y").to_string()).join(format!(
        "{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        ARTIFACT_EXTENSION
    ))
}
