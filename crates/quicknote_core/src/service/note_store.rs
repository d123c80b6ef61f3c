//! Note store: lifecycle and CRUD protocol over the `notes` table.
//!
//! # Responsibility
//! - Own the single connection to the note database.
//! - Expose initialize/list/get/create/update/delete with a typed failure taxonomy.
//!
//! # Invariants
//! - CRUD calls before a successful `initialize()` fail with `NotReady`.
//! - A failed `initialize()` leaves the store Uninitialized; it may be retried.
//! - Each CRUD call is one transaction; a failed write leaves the table unchanged.
//! - `update`/`delete` on a missing id affect zero rows and succeed.
//! - `list()` imposes no ordering; insertion order is not guaranteed unless
//!   the caller sorts.

use crate::config::StoreConfig;
use crate::db::{open_location, DbError};
use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteRepository, RepoError, SqliteNoteRepository};
use log::{debug, error, info, warn};
use rusqlite::Connection;
use std::time::Instant;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure surfaced by every store operation.
///
/// A failed `list()` is always an `Err`, never an empty vector.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be opened or its table created/verified.
    #[error("note store schema unavailable: {0}")]
    Schema(#[source] DbError),
    /// A read failed. Callers should keep their last known listing.
    #[error("note query failed: {0}")]
    Query(#[source] RepoError),
    /// A create/update/delete failed; the table is unchanged.
    #[error("note write failed: {0}")]
    Write(#[source] RepoError),
    /// A CRUD call arrived before a successful `initialize()`.
    #[error("note store is not initialized")]
    NotReady,
}

impl StoreError {
    /// Stable label used for `error_code=` in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Schema(_) => "schema_error",
            Self::Query(_) => "query_error",
            Self::Write(_) => "write_error",
            Self::NotReady => "not_ready",
        }
    }
}

#[derive(Debug)]
enum StoreState {
    Uninitialized,
    Ready(Connection),
}

/// Durable CRUD over the `notes` table.
///
/// The connection is opened by [`NoteStore::initialize`] from the injected
/// [`StoreConfig`] and kept for the lifetime of the store.
#[derive(Debug)]
pub struct NoteStore {
    config: StoreConfig,
    state: StoreState,
}

impl NoteStore {
    /// Creates an Uninitialized store. No I/O happens until `initialize()`.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            state: StoreState::Uninitialized,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, StoreState::Ready(_))
    }

    /// Opens the database and ensures the `notes` table exists.
    ///
    /// Idempotent: a Ready store returns `Ok(())` without reopening, and an
    /// existing table is never altered.
    ///
    /// # Errors
    /// - `StoreError::Schema` when the file cannot be opened, the table cannot
    ///   be created, or the file carries a newer schema version.
    pub fn initialize(&mut self) -> StoreResult<()> {
        if self.is_ready() {
            debug!("event=store_init module=store status=skip reason=already_ready");
            return Ok(());
        }

        let started_at = Instant::now();
        match open_location(&self.config) {
            Ok(conn) => {
                self.state = StoreState::Ready(conn);
                info!(
                    "event=store_init module=store status=ok mode={} duration_ms={}",
                    self.config.location.mode(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                self.state = StoreState::Uninitialized;
                error!(
                    "event=store_init module=store status=error mode={} duration_ms={} error_code=schema_error error={}",
                    self.config.location.mode(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(StoreError::Schema(err))
            }
        }
    }

    /// Returns every persisted note in storage-defined order.
    pub fn list(&mut self) -> StoreResult<Vec<Note>> {
        let started_at = Instant::now();
        let result = self
            .repo()
            .and_then(|mut repo| repo.list_notes().map_err(StoreError::Query));
        match &result {
            Ok(notes) => debug!(
                "event=note_list module=store status=ok count={} duration_ms={}",
                notes.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("note_list", started_at, err),
        }
        result
    }

    /// Returns the note with `id`, or `None` when no such row exists.
    pub fn get(&mut self, id: NoteId) -> StoreResult<Option<Note>> {
        let started_at = Instant::now();
        let result = self
            .repo()
            .and_then(|mut repo| repo.get_note(id).map_err(StoreError::Query));
        match &result {
            Ok(found) => debug!(
                "event=note_get module=store status=ok note_id={id} found={} duration_ms={}",
                found.is_some(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("note_get", started_at, err),
        }
        result
    }

    /// Inserts a new note and returns the id the store assigned to it.
    pub fn create(&mut self, text: &str) -> StoreResult<NoteId> {
        let started_at = Instant::now();
        let result = self
            .repo()
            .and_then(|mut repo| repo.insert_note(text).map_err(StoreError::Write));
        match &result {
            Ok(id) => info!(
                "event=note_create module=store status=ok note_id={id} text_len={} duration_ms={}",
                text.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("note_create", started_at, err),
        }
        result
    }

    /// Replaces the text of `id`. A missing id changes nothing and succeeds.
    pub fn update(&mut self, id: NoteId, text: &str) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = self
            .repo()
            .and_then(|mut repo| repo.update_note_text(id, text).map_err(StoreError::Write));
        match &result {
            Ok(changed) => info!(
                "event=note_update module=store status=ok note_id={id} rows={changed} text_len={} duration_ms={}",
                text.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("note_update", started_at, err),
        }
        result.map(|_| ())
    }

    /// Removes `id`. Removing a missing id is a no-op.
    pub fn delete(&mut self, id: NoteId) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = self
            .repo()
            .and_then(|mut repo| repo.delete_note(id).map_err(StoreError::Write));
        match &result {
            Ok(removed) => info!(
                "event=note_delete module=store status=ok note_id={id} rows={removed} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("note_delete", started_at, err),
        }
        result.map(|_| ())
    }

    fn repo(&mut self) -> StoreResult<SqliteNoteRepository<'_>> {
        match &mut self.state {
            StoreState::Ready(conn) => Ok(SqliteNoteRepository::new(conn)),
            StoreState::Uninitialized => Err(StoreError::NotReady),
        }
    }
}

fn log_failure(event: &str, started_at: Instant, err: &StoreError) {
    match err {
        StoreError::NotReady => warn!(
            "event={event} module=store status=error error_code=not_ready"
        ),
        other => error!(
            "event={event} module=store status=error duration_ms={} error_code={} error={other}",
            started_at.elapsed().as_millis(),
            other.code()
        ),
    }
}
