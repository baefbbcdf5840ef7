//! Marker selection and move state machine.
//!
//! # Responsibility
//! - Interpret taps, drags and panel actions against the current selection.
//! - Keep `MarkerStore`, persisted notes and marker icons consistent.
//!
//! # Invariants
//! - At most one marker is selected and at most one is moving; both are
//!   encoded in one `SelectionState` value, so they cannot diverge.
//! - `Moving(id)` is only entered from `Selected(id)`.
//! - Persistence happens before in-memory mutation. The live-typed
//!   description is the only exception and survives a failed commit.
//! - Every state transition recomputes the icons of the markers it touches.
//!
//! # See also
//! - `map::icon::resolve_icon`
//! - `map::snap::GpsSnapService`

use crate::map::events::{GestureEvent, PanelEvent, ViewEffect};
use crate::map::icon::{resolve_icon, CategoryResolver, IconError};
use crate::map::marker_store::{Marker, MarkerStore};
use crate::map::projection::GeoProjection;
use crate::map::snap::GpsSnapService;
use crate::model::category::CategoryId;
use crate::model::geo::{GeoPoint, ScreenPoint};
use crate::model::note::NoteId;
use crate::repo::category_repo::CategoryStore;
use crate::repo::note_repo::NoteGateway;
use crate::repo::settings_repo::SettingsStore;
use crate::repo::RepoError;
use crate::settings::MapSettings;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type SelectionResult<T> = Result<T, SelectionError>;

/// Failure of a selection controller operation.
#[derive(Debug)]
pub enum SelectionError {
    /// Operation invoked in a state that does not allow it (caller bug).
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
    /// Id not present in the marker store (caller bug, hit-testing mismatch).
    UnknownMarker(NoteId),
    Icon(IconError),
    Repo(RepoError),
}

impl Display for SelectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidState { operation, state } => {
                write!(f, "`{operation}` is not allowed in state `{state}`")
            }
            Self::UnknownMarker(id) => write!(f, "no marker with id {id}"),
            Self::Icon(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SelectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Icon(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::InvalidState { .. } | Self::UnknownMarker(_) => None,
        }
    }
}

impl From<RepoError> for SelectionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<IconError> for SelectionError {
    fn from(value: IconError) -> Self {
        Self::Icon(value)
    }
}

/// Which marker is selected or being moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionState {
    Idle,
    Selected(NoteId),
    /// Move mode. `anchor` is the screen pixel the marker stays pinned to
    /// while dragging; `origin` is the position before the move began.
    Moving {
        id: NoteId,
        anchor: Option<ScreenPoint>,
        origin: GeoPoint,
    },
}

impl SelectionState {
    /// Selected marker id; a moving marker is also the selected one.
    pub fn selected_id(&self) -> Option<NoteId> {
        match *self {
            Self::Idle => None,
            Self::Selected(id) | Self::Moving { id, .. } => Some(id),
        }
    }

    pub fn moving_id(&self) -> Option<NoteId> {
        match *self {
            Self::Moving { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Selected(_) => "selected",
            Self::Moving { .. } => "moving",
        }
    }
}

/// Orchestrates marker creation, selection, moving and deletion.
pub struct SelectionController<G, C, S> {
    gateway: G,
    categories: C,
    settings_store: S,
    settings: MapSettings,
    resolver: CategoryResolver,
    snap: GpsSnapService,
    markers: MarkerStore,
    state: SelectionState,
    draft_text: String,
    selected_photos: Vec<PathBuf>,
    photo_dir: PathBuf,
    effects: Vec<ViewEffect>,
}

impl<G, C, S> SelectionController<G, C, S>
where
    G: NoteGateway,
    C: CategoryStore,
    S: SettingsStore,
{
    /// Builds a controller and loads settings, categories and all markers.
    ///
    /// `photo_dir` is the directory photo files of notes are stored in.
    pub fn try_new(
        gateway: G,
        categories: C,
        settings_store: S,
        photo_dir: impl Into<PathBuf>,
    ) -> SelectionResult<Self> {
        let settings = MapSettings::load(&settings_store)?;
        let resolver = CategoryResolver::load(&categories)?;
        let mut controller = Self {
            gateway,
            categories,
            settings_store,
            settings,
            resolver,
            snap: GpsSnapService::new(),
            markers: MarkerStore::new(),
            state: SelectionState::Idle,
            draft_text: String::new(),
            selected_photos: Vec::new(),
            photo_dir: photo_dir.into(),
            effects: Vec::new(),
        };
        controller.reload_markers()?;
        Ok(controller)
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn selected_id(&self) -> Option<NoteId> {
        self.state.selected_id()
    }

    pub fn moving_id(&self) -> Option<NoteId> {
        self.state.moving_id()
    }

    pub fn markers(&self) -> &MarkerStore {
        &self.markers
    }

    pub fn marker(&self, id: NoteId) -> Option<&Marker> {
        self.markers.get(id)
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    pub fn resolver(&self) -> &CategoryResolver {
        &self.resolver
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Photo files of the selected note, in capture order.
    pub fn selected_photos(&self) -> &[PathBuf] {
        &self.selected_photos
    }

    /// Text typed while no marker was selected.
    pub fn draft_text(&self) -> &str {
        &self.draft_text
    }

    /// Takes the pending view effects, oldest first.
    pub fn drain_effects(&mut self) -> Vec<ViewEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Interprets a confirmed tap.
    ///
    /// A hit marker becomes selected. A tap on empty space creates a note at
    /// the tapped location (snapped to GPS when enabled) and selects it,
    /// transferring any draft text into the new note.
    ///
    /// # Errors
    /// - `InvalidState` while a marker is being moved.
    /// - `UnknownMarker` when `hit_marker` is not displayed.
    /// - `Repo`/`Icon` when creation fails; nothing is changed then.
    pub fn handle_tap(
        &mut self,
        projection: &impl GeoProjection,
        point: ScreenPoint,
        hit_marker: Option<NoteId>,
    ) -> SelectionResult<NoteId> {
        self.ensure_not_moving("handle_tap")?;
        match hit_marker {
            Some(id) => {
                self.select(id)?;
                Ok(id)
            }
            None => self.create_at(projection, point, true),
        }
    }

    /// Selects a marker programmatically (e.g. from the note list).
    pub fn select_by_id(&mut self, id: NoteId) -> SelectionResult<()> {
        self.ensure_not_moving("select_by_id")?;
        self.select(id)
    }

    /// Clears the selection. A no-op when nothing is selected.
    pub fn deselect(&mut self) -> SelectionResult<()> {
        self.ensure_not_moving("deselect")?;
        if let SelectionState::Selected(id) = self.state {
            self.state = SelectionState::Idle;
            self.selected_photos.clear();
            self.refresh_icon(id);
            self.effects.push(ViewEffect::Redraw);
        }
        Ok(())
    }

    /// Records editor text typed while no marker is selected.
    pub fn type_draft_text(&mut self, text: impl Into<String>) -> SelectionResult<()> {
        if self.state != SelectionState::Idle {
            return Err(self.reject("type_draft_text"));
        }
        self.draft_text = text.into();
        Ok(())
    }

    /// Enters move mode for the selected marker.
    pub fn begin_move(&mut self, id: NoteId) -> SelectionResult<()> {
        if self.state != SelectionState::Selected(id) {
            return Err(self.reject("begin_move"));
        }
        let origin = self.require_marker(id)?.position;
        self.state = SelectionState::Moving {
            id,
            anchor: None,
            origin,
        };
        info!("event=marker_move module=map status=start note_id={id}");
        self.effects.push(ViewEffect::Redraw);
        Ok(())
    }

    /// Pins the moving marker to `point` for the rest of the drag.
    pub fn on_drag_start(&mut self, point: ScreenPoint) -> SelectionResult<()> {
        if let SelectionState::Moving { anchor, .. } = &mut self.state {
            *anchor = Some(point);
            return Ok(());
        }
        Err(self.reject("on_drag_start"))
    }

    /// Re-places the moving marker under its anchor pixel for the current
    /// viewport. Called for every drag frame while the map pans.
    pub fn on_drag_frame(&mut self, projection: &impl GeoProjection) -> SelectionResult<GeoPoint> {
        let SelectionState::Moving {
            id,
            anchor: Some(anchor),
            ..
        } = self.state
        else {
            return Err(self.reject("on_drag_frame"));
        };

        let position = projection.screen_to_geo(anchor);
        self.markers.update_position(id, position);
        self.effects.push(ViewEffect::Redraw);
        Ok(position)
    }

    /// Finishes move mode and persists the final position.
    ///
    /// On persistence failure the marker returns to its pre-move position;
    /// in both cases the state goes back to `Selected(id)`.
    pub fn on_drag_end(&mut self, projection: &impl GeoProjection) -> SelectionResult<GeoPoint> {
        let SelectionState::Moving { id, anchor, origin } = self.state else {
            return Err(self.reject("on_drag_end"));
        };

        let position = match anchor {
            Some(anchor) => projection.screen_to_geo(anchor),
            None => self.require_marker(id)?.position,
        };
        self.state = SelectionState::Selected(id);
        self.effects.push(ViewEffect::Redraw);

        if let Err(err) = self.gateway.update_location(id, position) {
            error!(
                "event=marker_move module=map status=error note_id={id} error_code=update_location_failed error={err}"
            );
            self.markers.update_position(id, origin);
            return Err(err.into());
        }

        self.markers.update_position(id, position);
        self.effects.push(ViewEffect::CenterOn(position));
        info!("event=marker_move module=map status=ok note_id={id}");
        Ok(position)
    }

    /// Deletes the selected note, its photos and its marker.
    pub fn delete_selected(&mut self) -> SelectionResult<NoteId> {
        let SelectionState::Selected(id) = self.state else {
            return Err(self.reject("delete_selected"));
        };

        // Photo rows are needed to find the files, so they go before the note.
        self.gateway.remove_photos(id, &self.photo_dir)?;
        if let Err(err) = self.gateway.remove_note(id) {
            error!(
                "event=note_delete module=map status=error note_id={id} error_code=remove_note_failed error={err}"
            );
            self.resync_photos(id);
            return Err(err.into());
        }

        self.markers.remove(id);
        self.state = SelectionState::Idle;
        self.selected_photos.clear();
        self.effects.push(ViewEffect::Redraw);
        info!("event=note_delete module=map status=ok note_id={id}");
        Ok(id)
    }

    /// Moves a note to another category and remembers it for new notes.
    pub fn change_category(&mut self, id: NoteId, category_id: CategoryId) -> SelectionResult<()> {
        self.require_marker(id)?;
        if !self.resolver.contains(category_id) {
            error!(
                "event=note_category module=map status=error note_id={id} error_code=unknown_category category_id={category_id}"
            );
            return Err(IconError::UnknownCategory(category_id).into());
        }

        self.gateway.update_category(id, category_id)?;
        self.markers.update_category(id, category_id);
        self.refresh_icon(id);
        self.effects.push(ViewEffect::Redraw);

        self.settings
            .set_last_category_id(&self.settings_store, category_id)
            .map_err(|err| {
                error!(
                    "event=settings_write module=map status=error key=last_category_id error_code=set_failed error={err}"
                );
                SelectionError::from(err)
            })?;
        Ok(())
    }

    /// Live edit: updates the in-memory description only.
    pub fn edit_description(&mut self, id: NoteId, text: impl Into<String>) -> SelectionResult<()> {
        self.require_marker(id)?;
        self.markers.update_description(id, text);
        Ok(())
    }

    /// Persists the in-memory description of `id`.
    ///
    /// A failed write leaves the typed text in memory for a later retry.
    pub fn commit_description(&mut self, id: NoteId) -> SelectionResult<()> {
        let text = self.require_marker(id)?.description.clone();
        self.gateway.update_description(id, &text).map_err(|err| {
            error!(
                "event=note_save module=map status=error note_id={id} error_code=update_description_failed error={err}"
            );
            SelectionError::from(err)
        })?;
        info!("event=note_save module=map status=ok note_id={id}");
        Ok(())
    }

    /// Re-reads photo presence of `id` after photos were added elsewhere.
    pub fn refresh_photos(&mut self, id: NoteId) -> SelectionResult<()> {
        self.require_marker(id)?;
        let photos = self.gateway.photos_for(id)?;

        self.markers.update_photo_flag(id, !photos.is_empty());
        if self.state.selected_id() == Some(id) {
            self.selected_photos = self.photo_paths(photos);
        }
        self.refresh_icon(id);
        self.effects.push(ViewEffect::Redraw);
        Ok(())
    }

    /// Rebuilds the marker store from storage.
    ///
    /// A selection whose note no longer exists falls back to `Idle`; an
    /// in-flight move is abandoned.
    pub fn reload_markers(&mut self) -> SelectionResult<()> {
        let notes = self.gateway.all_notes()?;
        let mut photo_flags = Vec::with_capacity(notes.len());
        for note in &notes {
            photo_flags.push((note.id, self.gateway.has_photos(note.id)?));
        }

        self.markers.reload_from(&notes);
        for (id, has_photo) in photo_flags {
            self.markers.update_photo_flag(id, has_photo);
        }

        self.state = match self.state.selected_id() {
            Some(id) if self.markers.contains(id) => SelectionState::Selected(id),
            _ => SelectionState::Idle,
        };
        if self.state == SelectionState::Idle {
            self.selected_photos.clear();
        }
        if self.markers.is_empty() {
            self.draft_text.clear();
        }

        self.refresh_all_icons();
        self.effects.push(ViewEffect::Redraw);
        info!(
            "event=markers_reload module=map status=ok count={}",
            self.markers.len()
        );
        Ok(())
    }

    /// Re-reads the category table after edits and retints all markers.
    pub fn refresh_categories(&mut self) -> SelectionResult<()> {
        self.resolver.refresh(&self.categories)?;
        self.refresh_all_icons();
        self.effects.push(ViewEffect::Redraw);
        Ok(())
    }

    /// Returns to `Idle` on view teardown, dropping any move in progress.
    pub fn reset(&mut self) {
        let previous = self.state;
        self.state = SelectionState::Idle;
        self.draft_text.clear();
        self.selected_photos.clear();
        if let SelectionState::Moving { id, origin, .. } = previous {
            self.markers.update_position(id, origin);
        }
        if let Some(id) = previous.selected_id() {
            self.refresh_icon(id);
            self.effects.push(ViewEffect::Redraw);
        }
    }

    pub fn save_map_rotation(&mut self, angle: f32) -> SelectionResult<()> {
        self.settings.set_map_rotation(&self.settings_store, angle)?;
        Ok(())
    }

    pub fn set_tap_duration_mode(&mut self, enabled: bool) -> SelectionResult<()> {
        self.settings
            .set_tap_duration_mode(&self.settings_store, enabled)?;
        Ok(())
    }

    pub fn set_snap_note_to_gps(&mut self, enabled: bool) -> SelectionResult<()> {
        self.settings
            .set_snap_note_to_gps(&self.settings_store, enabled)?;
        Ok(())
    }

    /// Routes one map widget gesture.
    ///
    /// Empty-space taps create notes unless `tap_duration_mode` is set, in
    /// which case long presses do. Drags outside move mode are map pans and
    /// are ignored, as are taps during a move.
    pub fn dispatch_gesture(
        &mut self,
        projection: &impl GeoProjection,
        event: GestureEvent,
    ) -> SelectionResult<()> {
        let moving = self.state.moving_id();
        match event {
            GestureEvent::TapConfirmed { .. } | GestureEvent::LongPress { .. }
                if moving.is_some() => {}
            GestureEvent::TapConfirmed {
                point,
                hit_marker: Some(id),
            } => {
                self.handle_tap(projection, point, Some(id))?;
            }
            GestureEvent::TapConfirmed {
                point,
                hit_marker: None,
            } => {
                if !self.settings.tap_duration_mode {
                    self.handle_tap(projection, point, None)?;
                }
            }
            GestureEvent::LongPress { point } => {
                if self.settings.tap_duration_mode {
                    self.handle_tap(projection, point, None)?;
                }
            }
            GestureEvent::DragStart { .. } => {
                if let Some(id) = moving {
                    let anchor = projection.geo_to_screen(self.require_marker(id)?.position);
                    self.on_drag_start(anchor)?;
                }
            }
            GestureEvent::DragMove { .. } => {
                if let SelectionState::Moving {
                    anchor: Some(_), ..
                } = self.state
                {
                    self.on_drag_frame(projection)?;
                }
            }
            GestureEvent::DragEnd { .. } => {
                if moving.is_some() {
                    self.on_drag_end(projection)?;
                }
            }
        }
        Ok(())
    }

    /// Routes one marker panel action.
    pub fn dispatch_panel(&mut self, event: PanelEvent) -> SelectionResult<()> {
        match event {
            PanelEvent::Deleted { id } => {
                if self.state != SelectionState::Selected(id) {
                    return Err(self.reject("delete"));
                }
                self.delete_selected()?;
            }
            PanelEvent::Saved { id } => {
                self.commit_description(id)?;
                let category_id = self.require_marker(id)?.category_id;
                self.change_category(id, category_id)?;
            }
            PanelEvent::Moved { id } => self.begin_move(id)?,
            PanelEvent::CategoryChanged { id, category_id } => {
                self.change_category(id, category_id)?
            }
        }
        Ok(())
    }

    fn create_at(
        &mut self,
        projection: &impl GeoProjection,
        point: ScreenPoint,
        transfer_draft: bool,
    ) -> SelectionResult<NoteId> {
        let candidate = projection.screen_to_geo(point);
        let position = self
            .snap
            .maybe_snap(projection, candidate, self.settings.snap_note_to_gps);
        let category_id = self.settings.last_category_id;
        let icon = resolve_icon(&self.resolver, category_id, true, false)?;
        let description = if transfer_draft {
            self.draft_text.clone()
        } else {
            String::new()
        };

        let id = self
            .gateway
            .add_note(&description, position.lat, position.lon, category_id)
            .map_err(|err| {
                error!(
                    "event=note_create module=map status=error error_code=add_note_failed error={err}"
                );
                SelectionError::from(err)
            })?;

        let previous = self.state.selected_id();
        self.markers.add(Marker {
            id,
            position,
            category_id,
            description,
            has_photo: false,
            icon: Some(icon),
        });
        self.state = SelectionState::Selected(id);
        self.draft_text.clear();
        self.selected_photos.clear();
        if let Some(previous) = previous {
            self.refresh_icon(previous);
        }

        self.effects.push(ViewEffect::CenterOn(position));
        self.effects.push(ViewEffect::Redraw);
        info!(
            "event=note_create module=map status=ok note_id={id} category_id={category_id} snapped={}",
            position != candidate
        );
        Ok(id)
    }

    fn select(&mut self, id: NoteId) -> SelectionResult<()> {
        let position = self.require_marker(id)?.position;
        let photos = self.gateway.photos_for(id)?;

        let previous = self.state.selected_id();
        self.state = SelectionState::Selected(id);
        self.draft_text.clear();
        self.markers.update_photo_flag(id, !photos.is_empty());
        self.selected_photos = self.photo_paths(photos);
        if let Some(previous) = previous.filter(|previous| *previous != id) {
            self.refresh_icon(previous);
        }
        self.refresh_icon(id);

        self.effects.push(ViewEffect::CenterOn(position));
        self.effects.push(ViewEffect::Redraw);
        Ok(())
    }

    /// Re-reads photo presence after a partially applied delete so the
    /// marker never advertises photos storage no longer has.
    fn resync_photos(&mut self, id: NoteId) {
        let photos = match self.gateway.photos_for(id) {
            Ok(photos) => photos,
            Err(err) => {
                warn!(
                    "event=photo_resync module=map status=error note_id={id} error={err}"
                );
                Vec::new()
            }
        };
        self.markers.update_photo_flag(id, !photos.is_empty());
        if self.state.selected_id() == Some(id) {
            self.selected_photos = self.photo_paths(photos);
        }
        self.refresh_icon(id);
        self.effects.push(ViewEffect::Redraw);
    }

    fn refresh_icon(&mut self, id: NoteId) {
        let Some(marker) = self.markers.get(id) else {
            return;
        };
        let is_selected = self.state.selected_id() == Some(id);
        let icon = resolve_icon(&self.resolver, marker.category_id, is_selected, marker.has_photo)
            .ok();
        self.markers.set_icon(id, icon);
    }

    fn refresh_all_icons(&mut self) {
        let ids: Vec<NoteId> = self.markers.ids().collect();
        for id in ids {
            self.refresh_icon(id);
        }
    }

    fn photo_paths(&self, file_names: Vec<String>) -> Vec<PathBuf> {
        file_names
            .into_iter()
            .map(|name| self.photo_dir.join(name))
            .collect()
    }

    fn require_marker(&self, id: NoteId) -> SelectionResult<&Marker> {
        self.markers.get(id).ok_or_else(|| {
            error!("event=marker_lookup module=map status=error error_code=unknown_marker note_id={id}");
            SelectionError::UnknownMarker(id)
        })
    }

    fn ensure_not_moving(&self, operation: &'static str) -> SelectionResult<()> {
        if self.state.moving_id().is_some() {
            return Err(self.reject(operation));
        }
        Ok(())
    }

    fn reject(&self, operation: &'static str) -> SelectionError {
        let state = self.state.name();
        error!(
            "event=selection_rejected module=map status=error operation={operation} state={state}"
        );
        SelectionError::InvalidState { operation, state }
    }
}
