//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Keep every SQL statement touching `notes` in one place.
//! - Wrap each call in its own transaction so a failure leaves no partial write.
//!
//! # Invariants
//! - Writes use `BEGIN IMMEDIATE` to take the write lock before touching rows.
//! - Listing imposes no `ORDER BY`; row order is whatever SQLite returns.
//! - A `NULL` text column decodes as the empty string; any other non-text
//!   storage class is reported as `InvalidData`.

use crate::model::note::{Note, NoteId};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior};
use thiserror::Error;

const NOTE_SELECT_SQL: &str = "SELECT id, text FROM notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure raised by note persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] rusqlite::Error),
    #[error("invalid persisted note data: {0}")]
    InvalidData(String),
}

/// Data access contract used by [`crate::NoteStore`].
pub trait NoteRepository {
    /// Inserts one row and returns the id SQLite assigned to it.
    fn insert_note(&mut self, text: &str) -> RepoResult<NoteId>;
    /// Replaces the text of `id`. Returns the number of rows changed (0 or 1).
    fn update_note_text(&mut self, id: NoteId, text: &str) -> RepoResult<usize>;
    /// Removes `id`. Returns the number of rows removed (0 or 1).
    fn delete_note(&mut self, id: NoteId) -> RepoResult<usize>;
    fn get_note(&mut self, id: NoteId) -> RepoResult<Option<Note>>;
    fn list_notes(&mut self) -> RepoResult<Vec<Note>>;
}

/// SQLite-backed notes repository borrowing the store's connection.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Wraps a connection whose schema has already been initialized.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&mut self, text: &str) -> RepoResult<NoteId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("INSERT INTO notes (text) VALUES (?1);", [text])?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    fn update_note_text(&mut self, id: NoteId, text: &str) -> RepoResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE notes SET text = ?1 WHERE id = ?2;",
            rusqlite::params![text, id],
        )?;
        tx.commit()?;
        Ok(changed)
    }

    fn delete_note(&mut self, id: NoteId) -> RepoResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = tx.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        tx.commit()?;
        Ok(removed)
    }

    fn get_note(&mut self, id: NoteId) -> RepoResult<Option<Note>> {
        let tx = self.conn.transaction()?;
        let note = {
            let mut stmt = tx.prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
            let raw = stmt.query_row([id], RawNoteRow::read).optional()?;
            raw.map(RawNoteRow::into_note).transpose()?
        };
        tx.commit()?;
        Ok(note)
    }

    fn list_notes(&mut self) -> RepoResult<Vec<Note>> {
        let tx = self.conn.transaction()?;
        let notes = {
            let mut stmt = tx.prepare(&format!("{NOTE_SELECT_SQL};"))?;
            let mut rows = stmt.query([])?;
            let mut notes = Vec::new();
            while let Some(row) = rows.next()? {
                notes.push(RawNoteRow::read(row)?.into_note()?);
            }
            notes
        };
        tx.commit()?;
        Ok(notes)
    }
}

/// Column values copied out of a row before shape validation.
struct RawNoteRow {
    id: NoteId,
    text: RawText,
}

enum RawText {
    Null,
    Text(Vec<u8>),
    Other(&'static str),
}

impl RawNoteRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        let id: NoteId = row.get("id")?;
        let text = match row.get_ref("text")? {
            ValueRef::Null => RawText::Null,
            ValueRef::Text(bytes) => RawText::Text(bytes.to_vec()),
            ValueRef::Integer(_) => RawText::Other("integer"),
            ValueRef::Real(_) => RawText::Other("real"),
            ValueRef::Blob(_) => RawText::Other("blob"),
        };
        Ok(Self { id, text })
    }

    fn into_note(self) -> RepoResult<Note> {
        let text = match self.text {
            RawText::Null => String::new(),
            RawText::Text(bytes) => String::from_utf8(bytes).map_err(|_| {
                RepoError::InvalidData(format!("notes.text for id {} is not valid UTF-8", self.id))
            })?,
            RawText::Other(kind) => {
                return Err(RepoError::InvalidData(format!(
                    "notes.text for id {} has storage class `{kind}`, expected text",
                    self.id
                )));
            }
        };
        Ok(Note::new(self.id, text))
    }
}
