//! SQLite storage bootstrap and schema initialization entry points.
//!
//! # Responsibility
//! - Open and configure the single SQLite connection used by the store.
//! - Create the `notes` table exactly once per database file.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - No note row is read or written before the schema is verified.

use thiserror::Error;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_location};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening a database or verifying its schema.
#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to prepare database directory `{path}`: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    #[error("table `{table}` is missing column `{column}`")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
    #[error("column `{table}.{column}` {reason}")]
    InvalidColumn {
        table: &'static str,
        column: &'static str,
        reason: &'static str,
    },
}
