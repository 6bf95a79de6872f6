//! # cfgsnap-core
//!
//! Core library for cfgsnap: watches one config file's write notifications,
//! debounces them, and keeps deduplicated, timestamped backups under a
//! year-partitioned directory.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime. The coordinator runs on a plain thread.
//! - **Single owner**: All timer and fingerprint state lives in the [`Coordinator`];
//!   watchers only send [`Command`]s.
//! - **Backend agnostic**: No filesystem-notification crate here. The daemon
//!   bridges its watcher into the command channel.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cfgsnap_core::{load_config, Archiver, Coordinator};
//!
//! let config = load_config(Path::new("config.json"))?;
//! let archiver = Archiver::new(&config.yaml_file_path, &config.base_backup_dir_path);
//! let (tx, rx) = std::sync::mpsc::channel();
//! let summary = Coordinator::new(archiver, config.timings()).run(rx);
//! ```

pub mod archive;
pub mod config;
pub mod coordinator;
pub mod deadline;
pub mod error;
pub mod fingerprint;

pub use archive::{artifact_path, Archiver, BackupOutcome};
pub use config::{load_config, SnapConfig, Timings, DEFAULT_CONFIG_PATH};
pub use coordinator::{Command, Coordinator, RunSummary, Tick};
pub use deadline::Deadline;
pub use error::{Result, SnapError};
pub use fingerprint::Fingerprint;
