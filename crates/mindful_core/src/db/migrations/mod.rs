//! Ordered schema scripts and their runner.
//!
//! # Invariants
//! - Script `n` (zero-based) upgrades the schema to version `n + 1`;
//!   scripts are append-only.
//! - All pending scripts and the version bump commit in one transaction.

use crate::repo::{RepoError, RepoResult};
use log::info;
use rusqlite::Connection;

const SCRIPTS: &[&str] = &[include_str!("0001_init.sql")];

/// Schema version produced by the last known script.
pub fn latest_version() -> u32 {
    u32::try_from(SCRIPTS.len()).unwrap_or(u32::MAX)
}

/// Reads the schema version recorded in the database.
pub fn schema_version(conn: &Connection) -> RepoResult<u32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Brings the schema up to [`latest_version`].
///
/// # Errors
/// - `SchemaTooNew` when the database was written by a newer binary.
pub fn apply_migrations(conn: &mut Connection) -> RepoResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(RepoError::SchemaTooNew { found, supported });
    }

    let pending = &SCRIPTS[found as usize..];
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for script in pending {
        tx.execute_batch(script)?;
    }
    tx.pragma_update(None, "user_version", supported)?;
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from={found} to={supported} scripts={}",
        pending.len()
    );
    Ok(())
}
