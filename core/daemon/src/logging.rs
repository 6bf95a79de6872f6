//! Stdout logging for the daemon.
//!
//! `CFGSNAP_DEBUG_LOG` turns on debug output without having to spell a
//! `RUST_LOG` directive; otherwise `RUST_LOG` applies, defaulting to `info`.

use std::env;
use tracing_subscriber::EnvFilter;

const DEBUG_ENV: &str = "CFGSNAP_DEBUG_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

pub fn init() {
    let filter = if debug_requested(env::var(DEBUG_ENV).ok().as_deref()) {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn debug_requested(value: Option<&str>) -> bool {
    value
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
