//! Bridges `notify` events for the watched file into coordinator commands.
//!
//! The parent directory is watched rather than the file itself: editors that
//! save by writing a temp file and renaming it over the original replace the
//! inode, and a watch on the old inode would go silent. Events are filtered
//! down to the one watched path.

use cfgsnap_core::{Command, SnapError};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Live watch registration. Dropping it stops event delivery.
pub struct FileWatch {
    path: PathBuf,
    _watcher: RecommendedWatcher,
}

impl FileWatch {
    /// Canonical path of the watched file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn watch_file(path: &Path, commands: Sender<Command>) -> Result<FileWatch, SnapError> {
    let setup_error = |details: String| SnapError::WatchSetup {
        path: path.to_path_buf(),
        details,
    };

    let target = path
        .canonicalize()
        .map_err(|err| setup_error(format!("Failed to resolve watched file: {}", err)))?;
    if !target.is_file() {
        return Err(setup_error("Watched path is not a regular file".to_string()));
    }
    let parent = target
        .parent()
        .ok_or_else(|| setup_error("Watched file has no parent directory".to_string()))?
        .to_path_buf();

    let filter_target = target.clone();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let command = match res {
            Ok(event) if is_write_event(&event, &filter_target) => Command::WriteDetected,
            Ok(_) => return,
            Err(err) => Command::WatcherError(err.to_string()),
        };
        // The coordinator may already have shut down.
        let _ = commands.send(command);
    })
    .map_err(|err| setup_error(format!("Failed to create watcher: {}", err)))?;

    watcher
        .watch(&parent, RecursiveMode::NonRecursive)
        .map_err(|err| setup_error(format!("Failed to register watch: {}", err)))?;

    Ok(FileWatch {
        path: target,
        _watcher: watcher,
    })
}

/// True when `event` means new content may have landed at `target`.
pub fn is_write_event(event: &Event, target: &Path) -> bool {
    match event.kind {
        EventKind::Create(_)
        | EventKind::Modify(ModifyKind::Data(_))
        | EventKind::Modify(ModifyKind::Any)
        | EventKind::Modify(ModifyKind::Name(RenameMode::To))
        | EventKind::Modify(ModifyKind::Name(RenameMode::Any)) => {
            event.paths.iter().any(|p| p == target)
        }
        // Both carries [from, to]; only the destination matters.
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            event.paths.last().map(|p| p == target).unwrap_or(false)
        }
        _ => false,
    }
}
