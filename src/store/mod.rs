//! SQLite persistence for fixtures and odds snapshots.
//!
//! Typed records cross this boundary exactly once: rows are mapped to
//! `Fixture`/`OddsSnapshot` structs in the store and nothing above it
//! touches raw rows.

pub mod fixture_store;
pub mod schema;
pub mod snapshot_store;

pub use fixture_store::FixtureStore;
pub use schema::init_schema;
pub use snapshot_store::SnapshotStore;

use std::fs;
use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("could not create database directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },
}

/// Open the database, creating parent directories as needed, and enable
/// foreign key enforcement.
pub fn open(db_path: &str) -> Result<Connection, StoreError> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }
    }
    let conn = Connection::open(db_path)?;
    conn.pragma_update(None, "foreign_keys", true)?;
    Ok(conn)
}

/// In-memory database with the schema applied, for tests.
#[cfg(test)]
pub fn open_in_memory() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", true).unwrap();
    init_schema(&conn).unwrap();
    conn
}
