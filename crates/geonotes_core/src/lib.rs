//! Core domain logic for GeoNotes.
//! This crate owns the marker selection state machine and every invariant
//! around it; hosts only forward gestures and render the resulting markers.

pub mod config;
pub mod db;
pub mod logging;
pub mod map;
pub mod model;
pub mod repo;
pub mod service;
pub mod settings;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use map::events::{GestureEvent, PanelEvent, ViewEffect};
pub use map::icon::{resolve_icon, CategoryResolver, IconError, IconHandle, IconVariant};
pub use map::marker_store::{Marker, MarkerStore};
pub use map::projection::{GeoProjection, MercatorViewport};
pub use map::selection::{
    SelectionController, SelectionError, SelectionResult, SelectionState,
};
pub use map::snap::{GpsSnapService, SNAP_THRESHOLD_DP};
pub use model::category::{Category, CategoryId, RgbColor, DEFAULT_CATEGORIES};
pub use model::geo::{GeoPoint, ScreenPoint};
pub use model::note::{Note, NoteId};
pub use model::ModelError;
pub use repo::category_repo::{CategoryStore, SqliteCategoryRepository};
pub use repo::note_repo::{NoteGateway, SqliteNoteRepository};
pub use repo::settings_repo::{SettingsStore, SqliteSettingsRepository};
pub use repo::{RepoError, RepoResult};
pub use service::category_service::{CategoryRow, CategoryService};
pub use settings::MapSettings;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
