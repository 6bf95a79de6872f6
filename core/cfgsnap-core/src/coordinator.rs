//! Debounce and inactivity coordination for the watched file.
//!
//! The coordinator is the single owner of the mutable state: the debounce
//! deadline, the inactivity deadline and the archiver (which holds the last
//! fingerprint). Watcher callbacks never touch that state; they send
//! [`Command`]s over a channel and the coordinator applies them one at a time.
//!
//! # Timeline
//!
//! ```text
//! write  write      write             (quiet for `debounce`)
//!   |      |          |---------------------------------> backup, rearm inactivity
//!   +------+----------+ each write replaces the pending debounce
//! ```
//!
//! If the inactivity deadline passes without a debounce firing, [`Coordinator::run`]
//! returns and the caller shuts down. Closing the command channel stops
//! listening but pending deadlines are still honored.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::archive::{Archiver, BackupOutcome};
use crate::config::Timings;
use crate::deadline::Deadline;
use crate::error::SnapError;
use crate::fingerprint::Fingerprint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The watched file was written.
    WriteDetected,
    /// The watch backend reported an error.
    WatcherError(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub writes_seen: u64,
    pub backup_attempts: u64,
    pub artifacts_written: u64,
    pub watcher_errors: u64,
    pub last_fingerprint: Option<Fingerprint>,
}

/// What [`Coordinator::poll`] did at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Nothing was due.
    Idle,
    /// The debounce fired; a backup was attempted and inactivity rearmed.
    BackupAttempted,
    /// The inactivity window elapsed; the caller should shut down.
    Inactive,
}

pub struct Coordinator {
    archiver: Archiver,
    timings: Timings,
    debounce: Deadline,
    inactivity: Deadline,
    summary: RunSummary,
}

impl Coordinator {
    pub fn new(archiver: Archiver, timings: Timings) -> Self {
        Self {
            archiver,
            timings,
            debounce: Deadline::new(),
            inactivity: Deadline::new(),
            summary: RunSummary::default(),
        }
    }

    /// Processes commands until the inactivity window elapses.
    pub fn run(mut self, commands: Receiver<Command>) -> RunSummary {
        self.start(Instant::now());
        let mut listening = true;

        loop {
            let now = Instant::now();
            match self.poll(now) {
                Tick::BackupAttempted => continue,
                Tick::Inactive => break,
                Tick::Idle => {}
            }

            let wait = self
                .next_deadline()
                .map(|at| at.saturating_duration_since(now))
                .unwrap_or(self.timings.inactivity);

            if !listening {
                thread::sleep(wait);
                continue;
            }

            match commands.recv_timeout(wait) {
                Ok(command) => self.apply(command, Instant::now()),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("Watch channel closed; no further events will be received");
                    listening = false;
                }
            }
        }

        self.finish()
    }

    /// Arms the initial inactivity window.
    pub fn start(&mut self, now: Instant) {
        self.inactivity.arm(now, self.timings.inactivity);
    }

    pub fn apply(&mut self, command: Command, now: Instant) {
        match command {
            Command::WriteDetected => {
                self.summary.writes_seen += 1;
                debug!(path = %self.archiver.source().display(), "File modification detected");
                self.debounce.arm(now, self.timings.debounce);
            }
            Command::WatcherError(message) => {
                self.summary.watcher_errors += 1;
                let err = SnapError::WatcherRuntime(message);
                warn!(error = %err, "Watcher reported an error; continuing");
            }
        }
    }

    /// Fires whichever deadline is due at `now`.
    ///
    /// The debounce is checked first: a backup due at the same instant as the
    /// inactivity deadline counts as activity and pushes the window out.
    pub fn poll(&mut self, now: Instant) -> Tick {
        if self.debounce.take_due(now) {
            self.attempt_backup();
            self.inactivity.arm(now, self.timings.inactivity);
            return Tick::BackupAttempted;
        }
        if self.inactivity.take_due(now) {
            return Tick::Inactive;
        }
        Tick::Idle
    }

    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debounce.at()
    }

    pub fn inactivity_deadline(&self) -> Option<Instant> {
        self.inactivity.at()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            last_fingerprint: self.archiver.last_fingerprint(),
            ..self.summary.clone()
        }
    }

    fn finish(mut self) -> RunSummary {
        if self.debounce.at().is_some() {
            debug!("Discarding pending debounce at shutdown");
            self.debounce.cancel();
        }
        info!(
            inactivity_secs = self.timings.inactivity.as_secs_f64(),
            backups = self.summary.artifacts_written,
            "Exiting due to inactivity"
        );
        self.summary()
    }

    fn attempt_backup(&mut self) {
        self.summary.backup_attempts += 1;

        match self.archiver.backup() {
            Ok(BackupOutcome::Written { path, fingerprint }) => {
                self.summary.artifacts_written += 1;
                info!(
                    path = %path.display(),
                    fingerprint = %fingerprint,
                    "Backup created"
                );
            }
            Ok(BackupOutcome::Unchanged { fingerprint }) => {
                debug!(fingerprint = %fingerprint, "Content unchanged; skipping backup");
            }
            Err(err) => {
                warn!(error = %err, "Backup attempt failed");
            }
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        match (self.debounce.at(), self.inactivity.at()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
