//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical persisted note record.
//! - Provide the typed note identifier used by markers and selection state.
//!
//! # Invariants
//! - `NoteId` values come from storage and are never reused for another note.
//! - A note always references an existing category.

use crate::model::category::CategoryId;
use crate::model::geo::GeoPoint;
use crate::model::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Stable identifier of a persisted note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl NoteId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = ModelError;

    /// Parses an id handed over as text (list views, intents).
    ///
    /// A failure means the caller built the id string incorrectly.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<i64>()
            .map(NoteId)
            .map_err(|_| ModelError::InvalidNoteId(value.to_string()))
    }
}

/// Canonical persisted note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub lat: f64,
    pub lon: f64,
    pub description: String,
    pub category_id: CategoryId,
}

impl Note {
    /// Returns the note location as a geographic point.
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::NoteId;
    use crate::model::ModelError;

    #[test]
    fn note_id_parses_numeric_text() {
        assert_eq!(" 42 ".parse::<NoteId>().unwrap(), NoteId(42));
        assert_eq!(NoteId(7).to_string(), "7");
    }

    #[test]
    fn note_id_rejects_non_numeric_text() {
        let err = "marker-7".parse::<NoteId>().unwrap_err();
        assert_eq!(err, ModelError::InvalidNoteId("marker-7".to_string()));
    }
}
