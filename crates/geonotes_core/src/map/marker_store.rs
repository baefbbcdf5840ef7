//! In-memory mirror of the markers displayed on the map.
//!
//! # Invariants
//! - Exactly one marker per displayed note id.
//! - Every marker id is already persisted; the store never invents ids.
//! - Update calls on unknown ids return `false` and change nothing.

use crate::map::icon::IconHandle;
use crate::model::category::CategoryId;
use crate::model::geo::GeoPoint;
use crate::model::note::{Note, NoteId};
use std::collections::HashMap;

/// Displayed projection of a note plus presentation state.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: NoteId,
    pub position: GeoPoint,
    pub category_id: CategoryId,
    pub description: String,
    pub has_photo: bool,
    /// `None` only when icon derivation failed (logged integrity error).
    pub icon: Option<IconHandle>,
}

impl Marker {
    /// Builds an unselected, photo-less marker for a persisted note.
    pub fn from_note(note: &Note) -> Self {
        Self {
            id: note.id,
            position: note.position(),
            category_id: note.category_id,
            description: note.description.clone(),
            has_photo: false,
            icon: None,
        }
    }
}

/// Markers keyed by note id.
#[derive(Debug, Clone, Default)]
pub struct MarkerStore {
    markers: HashMap<NoteId, Marker>,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `marker`, returning the replaced one when the id was present.
    pub fn add(&mut self, marker: Marker) -> Option<Marker> {
        self.markers.insert(marker.id, marker)
    }

    pub fn remove(&mut self, id: NoteId) -> Option<Marker> {
        self.markers.remove(&id)
    }

    pub fn get(&self, id: NoteId) -> Option<&Marker> {
        self.markers.get(&id)
    }

    pub fn contains(&self, id: NoteId) -> bool {
        self.markers.contains_key(&id)
    }

    /// All markers in unspecified order.
    pub fn all(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = NoteId> + '_ {
        self.markers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn update_position(&mut self, id: NoteId, position: GeoPoint) -> bool {
        self.with_marker(id, |marker| marker.position = position)
    }

    pub fn update_description(&mut self, id: NoteId, text: impl Into<String>) -> bool {
        let text = text.into();
        self.with_marker(id, |marker| marker.description = text)
    }

    pub fn update_category(&mut self, id: NoteId, category_id: CategoryId) -> bool {
        self.with_marker(id, |marker| marker.category_id = category_id)
    }

    pub fn update_photo_flag(&mut self, id: NoteId, has_photo: bool) -> bool {
        self.with_marker(id, |marker| marker.has_photo = has_photo)
    }

    pub fn set_icon(&mut self, id: NoteId, icon: Option<IconHandle>) -> bool {
        self.with_marker(id, |marker| marker.icon = icon)
    }

    /// Clears the store and rebuilds it to mirror exactly `notes`.
    pub fn reload_from<'a>(&mut self, notes: impl IntoIterator<Item = &'a Note>) {
        self.markers.clear();
        for note in notes {
            self.markers.insert(note.id, Marker::from_note(note));
        }
    }

    fn with_marker(&mut self, id: NoteId, apply: impl FnOnce(&mut Marker)) -> bool {
        match self.markers.get_mut(&id) {
            Some(marker) => {
                apply(marker);
                true
            }
            None => false,
        }
    }
}
