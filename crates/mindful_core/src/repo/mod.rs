//! Persistence layer for the whole-state snapshot.
//!
//! # Responsibility
//! - Define the store contract consumed by the lifecycle service.
//! - Own the single error type for every storage failure, from opening the
//!   database to decoding a stored snapshot.
//!
//! # Invariants
//! - Storage failures never panic; they surface as [`RepoError`].

use crate::model::state::StateValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod state_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage failures.
#[derive(Debug)]
pub enum RepoError {
    Sqlite(rusqlite::Error),
    /// The database was written by a newer binary.
    SchemaTooNew { found: u32, supported: u32 },
    Encode(serde_json::Error),
    Decode(serde_json::Error),
    InvalidData(StateValidationError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "database schema version {found} is newer than supported {supported}"
            ),
            Self::Encode(err) => write!(f, "failed to encode state: {err}"),
            Self::Decode(err) => write!(f, "failed to decode stored state: {err}"),
            Self::InvalidData(err) => write!(f, "invalid stored state: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
            Self::Encode(err) | Self::Decode(err) => Some(err),
            Self::InvalidData(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
