//! Backup export and import.
//!
//! # Responsibility
//! - Serialize the full state as human-readable JSON with stable field names.
//! - Validate external payloads before they may replace current state.
//!
//! # Invariants
//! - Import never mutates anything; applying a parsed state is the caller's
//!   confirmed step (`LifecycleManager::replace_state`).
//! - Export then import of an unchanged state preserves item order, ids
//!   and XP.

use crate::model::state::{AppState, StateValidationError};
use chrono::NaiveDate;
use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// File name prefix of exported backups.
pub const EXPORT_FILE_PREFIX: &str = "progress_tracker_backup_";

/// Export failures.
#[derive(Debug)]
pub enum ExportError {
    Encode(serde_json::Error),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode backup: {err}"),
            Self::Io { path, source } => {
                write!(f, "failed to write backup `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Reasons an import payload is rejected.
#[derive(Debug)]
pub enum ImportError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Payload is not valid JSON.
    Syntax(serde_json::Error),
    /// Root value is not a JSON object.
    NotAnObject,
    /// `items` is missing or not an array.
    MissingItems,
    /// `user` is missing or not an object.
    MissingUser,
    /// Shape is right but a record failed to decode.
    Record(serde_json::Error),
    Invalid(StateValidationError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read backup `{}`: {source}", path.display())
            }
            Self::Syntax(err) => write!(f, "backup is not valid JSON: {err}"),
            Self::NotAnObject => write!(f, "invalid data format: expected a JSON object"),
            Self::MissingItems => write!(f, "invalid data format: `items` must be an array"),
            Self::MissingUser => write!(f, "invalid data format: `user` must be an object"),
            Self::Record(err) => write!(f, "invalid data format: {err}"),
            Self::Invalid(err) => write!(f, "invalid data: {err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Syntax(err) | Self::Record(err) => Some(err),
            Self::Invalid(err) => Some(err),
            Self::NotAnObject | Self::MissingItems | Self::MissingUser => None,
        }
    }
}

/// Pretty-printed JSON of the full state (2-space indent).
pub fn export_json(state: &AppState) -> Result<String, ExportError> {
    serde_json::to_string_pretty(state).map_err(ExportError::Encode)
}

/// Backup file name for `date`, e.g. `progress_tracker_backup_2026-10-16.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{EXPORT_FILE_PREFIX}{}.json", date.format("%Y-%m-%d"))
}

/// Writes a dated backup into `dir` and returns its path.
///
/// An existing backup with the same date is overwritten.
pub fn write_export(dir: &Path, state: &AppState, date: NaiveDate) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_file_name(date));
    let body = export_json(state)?;
    std::fs::write(&path, body.as_bytes()).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    info!(
        "event=state_export module=transfer status=ok items={} bytes={}",
        state.items.len(),
        body.len()
    );
    Ok(path)
}

/// Parses and validates an import payload.
///
/// The shape check (`items` array, `user` object) runs before typed
/// decoding so malformed files get a precise message.
pub fn parse_import(text: &str) -> Result<AppState, ImportError> {
    let result = decode_payload(text);
    if let Err(err) = &result {
        warn!("event=state_import module=transfer status=rejected error={err}");
    }
    result
}

/// Reads a backup file and parses it with [`parse_import`].
pub fn read_import(path: &Path) -> Result<AppState, ImportError> {
    let text = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_import(&text)
}

fn decode_payload(text: &str) -> Result<AppState, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::Syntax)?;
    let Some(root) = value.as_object() else {
        return Err(ImportError::NotAnObject);
    };
    if !root.get("items").is_some_and(Value::is_array) {
        return Err(ImportError::MissingItems);
    }
    if !root.get("user").is_some_and(Value::is_object) {
        return Err(ImportError::MissingUser);
    }

    let mut state: AppState = serde_json::from_value(value).map_err(ImportError::Record)?;
    state.validate().map_err(ImportError::Invalid)?;
    state.normalize();

    info!(
        "event=state_import module=transfer status=parsed items={} xp={}",
        state.items.len(),
        state.user.xp()
    );
    Ok(state)
}
