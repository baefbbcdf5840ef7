//! Event types crossing the map core boundary.
//!
//! Gesture events come from the map widget, panel events from the marker
//! detail panel. View effects flow back out to the host for rendering.

use crate::model::category::CategoryId;
use crate::model::geo::{GeoPoint, ScreenPoint};
use crate::model::note::NoteId;
use serde::{Deserialize, Serialize};

/// Touch gestures recognized by the map widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GestureEvent {
    /// Confirmed single tap; `hit_marker` is set when the widget hit-tested a
    /// marker under the finger.
    TapConfirmed {
        point: ScreenPoint,
        hit_marker: Option<NoteId>,
    },
    LongPress {
        point: ScreenPoint,
    },
    DragStart {
        point: ScreenPoint,
    },
    DragMove {
        point: ScreenPoint,
    },
    DragEnd {
        point: ScreenPoint,
    },
}

/// Actions raised by the marker detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelEvent {
    Deleted { id: NoteId },
    /// Commit the live-edited description and current category.
    Saved { id: NoteId },
    Moved { id: NoteId },
    CategoryChanged { id: NoteId, category_id: CategoryId },
}

/// Side effects the host view must apply after an operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewEffect {
    Redraw,
    /// Keep the current zoom and center the viewport on the position.
    CenterOn(GeoPoint),
}
