//! Configuration loading.
//!
//! The config document names the watched file and the backup root. JSON is the
//! default format; a `.toml` extension switches to TOML. Keys are camelCase in
//! both formats:
//!
//! ```json
//! { "yamlFilePath": "./app.yml", "baseBackupDirPath": "./backups" }
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, SnapError};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_DEBOUNCE_SECS: f64 = 3.0 * 60.0;
pub const DEFAULT_INACTIVITY_SECS: f64 = 10.0 * 60.0;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapConfig {
    pub yaml_file_path: PathBuf,
    pub base_backup_dir_path: PathBuf,
    #[serde(default = "default_debounce_secs")]
    pub debounce_secs: f64,
    #[serde(default = "default_inactivity_secs")]
    pub inactivity_secs: f64,
}

fn default_debounce_secs() -> f64 {
    DEFAULT_DEBOUNCE_SECS
}

fn default_inactivity_secs() -> f64 {
    DEFAULT_INACTIVITY_SECS
}

/// Quiet period before a backup, and idle window before shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub debounce: Duration,
    pub inactivity: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs_f64(DEFAULT_DEBOUNCE_SECS),
            inactivity: Duration::from_secs_f64(DEFAULT_INACTIVITY_SECS),
        }
    }
}

impl SnapConfig {
    pub fn timings(&self) -> Timings {
        Timings {
            debounce: Duration::from_secs_f64(self.debounce_secs),
            inactivity: Duration::from_secs_f64(self.inactivity_secs),
        }
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |details: String| SnapError::Config {
            path: path.to_path_buf(),
            details,
        };

        if self.yaml_file_path.as_os_str().is_empty() {
            return Err(invalid("yamlFilePath must not be empty".to_string()));
        }
        if self.base_backup_dir_path.as_os_str().is_empty() {
            return Err(invalid("baseBackupDirPath must not be empty".to_string()));
        }
        for (name, value) in [
            ("debounceSecs", self.debounce_secs),
            ("inactivitySecs", self.inactivity_secs),
        ] {
            // Upper bound keeps Duration::from_secs_f64 from panicking.
            if !value.is_finite() || value <= 0.0 || value > u32::MAX as f64 {
                return Err(invalid(format!(
                    "{} must be a positive number of seconds, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Reads and validates the config at `path`.
pub fn load_config(path: &Path) -> Result<SnapConfig> {
    let content = fs_err::read_to_string(path).map_err(|err| SnapError::Config {
        path: path.to_path_buf(),
        details: format!("Failed to read config: {}", err),
    })?;

    let config = parse_config(path, &content)?;
    config.validate(path)?;
    Ok(config)
}

fn parse_config(path: &Path, content: &str) -> Result<SnapConfig> {
    let is_toml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    let parsed = if is_toml {
        toml::from_str::<SnapConfig>(content).map_err(|err| err.to_string())
    } else {
        serde_json::from_str::<SnapConfig>(content).map_err(|err| err.to_string())
    };

    parsed.map_err(|details| SnapError::Config {
        path: path.to_path_buf(),
        details: format!("Failed to parse config: {}", details),
    })
}
