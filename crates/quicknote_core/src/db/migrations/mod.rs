//! Versioned schema initializer.
//!
//! Only the initial `notes` table exists today; the registry keeps the
//! version bookkeeping so an older binary refuses a newer database file.

use crate::db::{DbError, DbResult};
use rusqlite::{Connection, TransactionBehavior};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Columns the store reads and writes, checked after every bootstrap.
const NOTES_COLUMNS: [&str; 2] = ["id", "text"];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the connection to the latest schema version and verifies the
/// `notes` table shape.
///
/// Safe to call on every start: an up-to-date database is left untouched.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current = current_user_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    if current == latest {
        return verify_notes_table(conn);
    }

    // Verification runs before commit so a rejected file keeps its old version.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
    }
    verify_notes_table(&tx)?;
    tx.commit()?;
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?;
    Ok(version)
}

struct ColumnInfo {
    name: String,
    decl_type: String,
    pk: i64,
}

/// Rejects `notes` tables that would let ids be reused or left unassigned.
///
/// `id` must be the sole `INTEGER PRIMARY KEY` (a rowid alias) and the table
/// must be declared `AUTOINCREMENT`.
fn verify_notes_table(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare("PRAGMA table_info(notes);")?;
    let columns = stmt
        .query_map([], |row| {
            Ok(ColumnInfo {
                name: row.get("name")?,
                decl_type: row.get("type")?,
                pk: row.get("pk")?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    for column in NOTES_COLUMNS {
        if !columns.iter().any(|info| info.name == column) {
            return Err(DbError::MissingColumn {
                table: "notes",
                column,
            });
        }
    }

    let invalid_id = |reason| DbError::InvalidColumn {
        table: "notes",
        column: "id",
        reason,
    };
    let key_columns = columns.iter().filter(|info| info.pk > 0).count();
    let id_is_rowid_alias = columns.iter().any(|info| {
        info.name == "id" && info.pk == 1 && info.decl_type.eq_ignore_ascii_case("INTEGER")
    });
    if key_columns != 1 || !id_is_rowid_alias {
        return Err(invalid_id("must be the only INTEGER PRIMARY KEY"));
    }

    let table_sql: String = conn.query_row(
        "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'notes';",
        [],
        |row| row.get(0),
    )?;
    if !table_sql.to_ascii_uppercase().contains("AUTOINCREMENT") {
        return Err(invalid_id("must be declared AUTOINCREMENT"));
    }

    Ok(())
}
