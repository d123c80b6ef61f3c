//! Note domain model.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never changes afterwards.
//! - `id` values are never reused, even after the row is deleted.

use serde::{Deserialize, Serialize};

/// Store-assigned row identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = i64;

/// One persisted note: an `(id, text)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// User-authored body. May be empty or span multiple lines.
    pub text: String,
}

impl Note {
    pub fn new(id: NoteId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Note;

    #[test]
    fn serializes_as_flat_id_text_object() {
        let note = Note::new(1, "Buy milk");
        let json = serde_json::to_value(&note).expect("note should serialize");
        assert_eq!(json, serde_json::json!({ "id": 1, "text": "Buy milk" }));
    }

    #[test]
    fn deserialize_rejects_missing_text() {
        let parsed = serde_json::from_str::<Note>(r#"{"id": 3}"#);
        assert!(parsed.is_err());
    }
}
