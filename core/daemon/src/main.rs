//! cfgsnap daemon entrypoint.
//!
//! Watches one config file, backs it up after writes settle, and exits on its
//! own once nothing has happened for the inactivity window. Startup failures
//! (bad config, unwatchable file) exit with status 1; an idle shutdown exits 0.

use cfgsnap_core::{load_config, Archiver, Coordinator, SnapError, DEFAULT_CONFIG_PATH};
use clap::Parser;
use std::path::PathBuf;
use std::sync::mpsc;
use tracing::{error, info};

mod logging;
mod watcher;

#[derive(Parser)]
#[command(name = "cfgsnap")]
#[command(about = "Keeps timestamped backups of a config file while it is being edited")]
#[command(version)]
struct Cli {
    /// Config document (JSON, or TOML when the extension is .toml)
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    info!(config = %cli.config.display(), "cfgsnap starting");

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(err) => exit_on_startup_error(err),
    };
    let timings = config.timings();
    info!(
        watched = %config.yaml_file_path.display(),
        backups = %config.base_backup_dir_path.display(),
        debounce_secs = timings.debounce.as_secs_f64(),
        inactivity_secs = timings.inactivity.as_secs_f64(),
        "Configuration loaded"
    );

    let (tx, rx) = mpsc::channel();
    let watch = match watcher::watch_file(&config.yaml_file_path, tx) {
        Ok(watch) => watch,
        Err(err) => exit_on_startup_error(err),
    };
    info!(path = %watch.path().display(), "Watching for modifications");

    let archiver = Archiver::new(watch.path(), &config.base_backup_dir_path);
    let summary = Coordinator::new(archiver, timings).run(rx);

    drop(watch);
    info!(
        writes_seen = summary.writes_seen,
        backup_attempts = summary.backup_attempts,
        artifacts_written = summary.artifacts_written,
        watcher_errors = summary.watcher_errors,
        "cfgsnap stopped"
    );
}

fn exit_on_startup_error(err: SnapError) -> ! {
    error!(error = %err, fatal = err.is_fatal(), "Startup failed");
    std::process::exit(1);
}
