//! Store configuration.
//!
//! # Responsibility
//! - Describe where the note database lives and how its connection behaves.
//! - Resolve the default location from `QUICKNOTE_DB_PATH` or the user data dir.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the database file location.
pub const DB_PATH_ENV: &str = "QUICKNOTE_DB_PATH";

const DB_DIR_NAME: &str = "quicknote";
const DB_FILE_NAME: &str = "task.db";
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Backing storage for a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// SQLite database file. Parent directories are created on open.
    File(PathBuf),
    /// Private in-memory database, dropped with the connection.
    InMemory,
}

impl DbLocation {
    /// Short label used in log lines.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::InMemory => "memory",
        }
    }
}

/// Connection settings injected into [`crate::NoteStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: DbLocation,
    /// How long SQLite waits on a locked database before failing a statement.
    pub busy_timeout: Duration,
}

impl StoreConfig {
    /// Configuration for a database file at `path`.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            location: DbLocation::File(path.as_ref().to_path_buf()),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Configuration for a throwaway in-memory database.
    pub fn in_memory() -> Self {
        Self {
            location: DbLocation::InMemory,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Resolves the database file from the process environment.
    ///
    /// Order: `QUICKNOTE_DB_PATH` (when non-blank), then
    /// `<data dir>/quicknote/task.db`, then the system temp dir.
    pub fn from_env() -> Self {
        Self::file(resolve_db_path(std::env::var(DB_PATH_ENV).ok().as_deref()))
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }
}

fn resolve_db_path(env_value: Option<&str>) -> PathBuf {
    if let Some(raw) = env_value {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(DB_DIR_NAME)
        .join(DB_FILE_NAME)
}
