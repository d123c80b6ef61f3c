//! Connection bootstrap for SQLite.
//!
//! # Invariants
//! - Returned connections have the busy timeout from [`StoreConfig`] applied.
//! - Returned connections have the `notes` schema fully initialized.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use crate::config::{DbLocation, StoreConfig};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens the database described by `config` and initializes its schema.
///
/// # Side effects
/// - Creates missing parent directories for file databases.
/// - Emits `db_open` log events with duration and status.
pub fn open_location(config: &StoreConfig) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = config.location.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect(&config.location)
        .and_then(|mut conn| bootstrap_connection(&mut conn, config.busy_timeout).map(|()| conn));

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code={} error={err}",
            started_at.elapsed().as_millis(),
            error_code(err)
        ),
    }

    result
}

/// Opens a database file with default settings.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_location(&StoreConfig::file(path))
}

/// Opens an in-memory database with default settings.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_location(&StoreConfig::in_memory())
}

fn connect(location: &DbLocation) -> DbResult<Connection> {
    match location {
        DbLocation::File(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|source| DbError::Io {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
            }
            Ok(Connection::open(path)?)
        }
        DbLocation::InMemory => Ok(Connection::open_in_memory()?),
    }
}

fn bootstrap_connection(conn: &mut Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.busy_timeout(busy_timeout)?;
    apply_migrations(conn)
}

fn error_code(err: &DbError) -> &'static str {
    match err {
        DbError::Io { .. } => "db_dir_failed",
        DbError::Sqlite(_) => "db_sqlite_failed",
        DbError::UnsupportedSchemaVersion { .. } => "db_schema_too_new",
        DbError::MissingColumn { .. } | DbError::InvalidColumn { .. } => "db_schema_invalid",
    }
}
