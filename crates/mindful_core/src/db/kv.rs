//! Key-value access to the `kv_entries` table.
//!
//! # Invariants
//! - One row per key; writes replace the previous value and bump
//!   `updated_at` (unix milliseconds).

use crate::repo::RepoResult;
use rusqlite::{params, Connection, OptionalExtension};

/// Returns the value stored under `key`, if any.
pub fn read_entry(conn: &Connection, key: &str) -> RepoResult<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM kv_entries WHERE key = ?1;",
            [key],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(value)
}

/// Inserts or replaces the value under `key` in a single statement.
pub fn write_entry(conn: &Connection, key: &str, value: &str) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO kv_entries (key, value)
         VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![key, value],
    )?;
    Ok(())
}

/// Deletes `key`. Returns whether a row existed.
pub fn delete_entry(conn: &Connection, key: &str) -> RepoResult<bool> {
    let removed = conn.execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
    Ok(removed > 0)
}
