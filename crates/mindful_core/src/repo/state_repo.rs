//! Whole-state store contract and SQLite key-value implementation.
//!
//! # Responsibility
//! - Persist the full `AppState` snapshot under one well-known key.
//! - Map "nothing stored" and "unreadable snapshot" to the initial state.
//!
//! # Invariants
//! - `save` replaces the previous snapshot atomically (single upsert).
//! - Read paths reject invalid persisted state instead of masking it;
//!   only `load_or_initial` falls back, and it logs when doing so.

use crate::db::kv;
use crate::model::state::AppState;
use crate::repo::{RepoError, RepoResult};
use log::{error, info, warn};
use rusqlite::Connection;

/// Key under which the snapshot is stored.
pub const STATE_KEY: &str = "progressTrackerState";

/// Opaque snapshot store.
pub trait StateStore {
    /// Returns the stored snapshot, or `None` when nothing was saved yet.
    fn load(&self) -> RepoResult<Option<AppState>>;
    /// Replaces the stored snapshot.
    fn save(&self, state: &AppState) -> RepoResult<()>;
    /// Removes the stored snapshot. Clearing an empty store succeeds.
    fn clear(&self) -> RepoResult<()>;
}

impl<S: StateStore + ?Sized> StateStore for &S {
    fn load(&self) -> RepoResult<Option<AppState>> {
        (**self).load()
    }

    fn save(&self, state: &AppState) -> RepoResult<()> {
        (**self).save(state)
    }

    fn clear(&self) -> RepoResult<()> {
        (**self).clear()
    }
}

/// Loads the stored snapshot, falling back to [`AppState::initial`].
///
/// A missing snapshot is the normal first-launch path. Unreadable data is
/// logged and replaced by the initial state in memory only; the stored
/// bytes stay untouched until the next successful save.
pub fn load_or_initial<S: StateStore>(store: &S) -> AppState {
    match store.load() {
        Ok(Some(state)) => state,
        Ok(None) => {
            info!("event=state_load module=repo status=empty");
            AppState::initial()
        }
        Err(err) => {
            error!(
                "event=state_load module=repo status=error error_code=state_unreadable error={err}"
            );
            AppState::initial()
        }
    }
}

/// SQLite-backed key-value snapshot store.
pub struct SqliteStateStore<'conn> {
    conn: &'conn Connection,
    key: String,
}

impl<'conn> SqliteStateStore<'conn> {
    /// Creates a store using the default [`STATE_KEY`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_key(conn, STATE_KEY)
    }

    /// Creates a store bound to a custom key.
    pub fn with_key(conn: &'conn Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }

    /// Returns the raw stored JSON, if any.
    pub fn load_raw(&self) -> RepoResult<Option<String>> {
        kv::read_entry(self.conn, &self.key)
    }
}

impl StateStore for SqliteStateStore<'_> {
    fn load(&self) -> RepoResult<Option<AppState>> {
        let Some(raw) = self.load_raw()? else {
            return Ok(None);
        };

        let mut state: AppState = serde_json::from_str(&raw).map_err(RepoError::Decode)?;
        state.validate().map_err(RepoError::InvalidData)?;
        state.normalize();

        info!(
            "event=state_load module=repo status=ok items={} bytes={}",
            state.items.len(),
            raw.len()
        );
        Ok(Some(state))
    }

    fn save(&self, state: &AppState) -> RepoResult<()> {
        let encoded = serde_json::to_string(state).map_err(RepoError::Encode)?;

        match kv::write_entry(self.conn, &self.key, &encoded) {
            Ok(()) => {
                info!(
                    "event=state_save module=repo status=ok items={} bytes={}",
                    state.items.len(),
                    encoded.len()
                );
                Ok(())
            }
            Err(err) => {
                warn!("event=state_save module=repo status=error error={err}");
                Err(err)
            }
        }
    }

    fn clear(&self) -> RepoResult<()> {
        let existed = kv::delete_entry(self.conn, &self.key)?;
        info!("event=state_clear module=repo status=ok existed={existed}");
        Ok(())
    }
}
