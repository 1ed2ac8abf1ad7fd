//! Runtime configuration for the CLI.
//!
//! # Responsibility
//! - Resolve where the database and logs live.
//! - Pick the log level for this process.
//!
//! # Invariants
//! - `data_dir` is always absolute (the logger refuses relative paths).

use anyhow::{anyhow, Context};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "mindful";
const DB_FILE_NAME: &str = "mindful.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    /// Resolves configuration from CLI/env values with platform defaults.
    ///
    /// `data_dir`: explicit value, else `<platform data dir>/mindful`.
    /// `log_level`: explicit value, else the build-mode default.
    pub fn resolve(data_dir: Option<PathBuf>, log_level: Option<String>) -> anyhow::Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => absolutize(&dir)?,
            None => dirs::data_dir()
                .map(|base| base.join(APP_DIR_NAME))
                .ok_or_else(|| anyhow!("cannot determine a data directory; pass --data-dir"))?,
        };
        let log_level = log_level
            .filter(|level| !level.trim().is_empty())
            .unwrap_or_else(|| mindful_core::default_log_level().to_string());

        Ok(Self {
            data_dir,
            log_level,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

fn absolutize(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    Ok(cwd.join(path))
}
