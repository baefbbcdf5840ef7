//! Domain model for geo-located notes and their categories.
//!
//! # Responsibility
//! - Define the canonical records persisted by the note gateway.
//! - Define geographic and screen coordinate value types.
//!
//! # Invariants
//! - Every persisted note is identified by a stable `NoteId` assigned by storage.
//! - Categories are never deleted, only renamed or recolored.

pub mod category;
pub mod geo;
pub mod note;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Parse/validation error for model value types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A note id string that should always be numeric failed to parse.
    InvalidNoteId(String),
    /// A color string is not in `#rrggbb` form.
    InvalidColor(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNoteId(value) => write!(f, "invalid note id `{value}`"),
            Self::InvalidColor(value) => {
                write!(f, "invalid color `{value}`; expected #rrggbb")
            }
        }
    }
}

impl Error for ModelError {}
