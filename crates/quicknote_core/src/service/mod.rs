//! Store services exposed to shells.
//!
//! # Responsibility
//! - `note_store`: synchronous lifecycle + CRUD over one owned connection.
//! - `store_handle`: async, single-worker facade delivering one result per call.

pub mod note_store;
pub mod store_handle;
