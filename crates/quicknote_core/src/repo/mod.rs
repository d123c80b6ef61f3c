//! Repository layer: SQL access for the `notes` table.
//!
//! # Invariants
//! - Every repository call runs inside exactly one transaction.
//! - Rows are decoded into [`crate::Note`]; unexpected shapes are rejected.

pub mod note_repo;
