//! Domain model for persisted notes.
//!
//! # Invariants
//! - Every note is identified by a store-assigned `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
