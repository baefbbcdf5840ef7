//! Typed map settings context.
//!
//! # Responsibility
//! - Decode persisted key/value settings into one explicit context object
//!   handed to the selection controller at construction.
//! - Write changed values back through `SettingsStore`.
//!
//! # Keys
//! - `last_category_id`: category used for newly created notes (default `1`).
//! - `map_rotation`: last map rotation angle in degrees (default `0.0`).
//! - `tap_duration_mode`: `true` creates notes on long press instead of a
//!   confirmed single tap (default `false`).
//! - `snap_note_to_gps`: snap new notes to the GPS fix (default `false`).

use crate::model::category::CategoryId;
use crate::repo::settings_repo::SettingsStore;
use crate::repo::{RepoError, RepoResult};
use std::str::FromStr;

pub const KEY_LAST_CATEGORY_ID: &str = "last_category_id";
pub const KEY_MAP_ROTATION: &str = "map_rotation";
pub const KEY_TAP_DURATION_MODE: &str = "tap_duration_mode";
pub const KEY_SNAP_NOTE_TO_GPS: &str = "snap_note_to_gps";

const DEFAULT_CATEGORY_ID: CategoryId = CategoryId(1);

/// Settings consumed and produced by the map core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSettings {
    pub last_category_id: CategoryId,
    pub map_rotation: f32,
    pub tap_duration_mode: bool,
    pub snap_note_to_gps: bool,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            last_category_id: DEFAULT_CATEGORY_ID,
            map_rotation: 0.0,
            tap_duration_mode: false,
            snap_note_to_gps: false,
        }
    }
}

impl MapSettings {
    /// Loads all keys, falling back to defaults for missing ones.
    ///
    /// # Errors
    /// - `RepoError::InvalidData` when a stored value does not decode.
    pub fn load(store: &impl SettingsStore) -> RepoResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            last_category_id: read_parsed::<i64>(store, KEY_LAST_CATEGORY_ID)?
                .map_or(defaults.last_category_id, CategoryId),
            map_rotation: read_parsed(store, KEY_MAP_ROTATION)?.unwrap_or(defaults.map_rotation),
            tap_duration_mode: read_parsed(store, KEY_TAP_DURATION_MODE)?
                .unwrap_or(defaults.tap_duration_mode),
            snap_note_to_gps: read_parsed(store, KEY_SNAP_NOTE_TO_GPS)?
                .unwrap_or(defaults.snap_note_to_gps),
        })
    }

    pub fn set_last_category_id(
        &mut self,
        store: &impl SettingsStore,
        id: CategoryId,
    ) -> RepoResult<()> {
        store.set(KEY_LAST_CATEGORY_ID, &id.get().to_string())?;
        self.last_category_id = id;
        Ok(())
    }

    pub fn set_map_rotation(&mut self, store: &impl SettingsStore, angle: f32) -> RepoResult<()> {
        store.set(KEY_MAP_ROTATION, &angle.to_string())?;
        self.map_rotation = angle;
        Ok(())
    }

    pub fn set_tap_duration_mode(
        &mut self,
        store: &impl SettingsStore,
        enabled: bool,
    ) -> RepoResult<()> {
        store.set(KEY_TAP_DURATION_MODE, &enabled.to_string())?;
        self.tap_duration_mode = enabled;
        Ok(())
    }

    pub fn set_snap_note_to_gps(
        &mut self,
        store: &impl SettingsStore,
        enabled: bool,
    ) -> RepoResult<()> {
        store.set(KEY_SNAP_NOTE_TO_GPS, &enabled.to_string())?;
        self.snap_note_to_gps = enabled;
        Ok(())
    }
}

fn read_parsed<T: FromStr>(store: &impl SettingsStore, key: &str) -> RepoResult<Option<T>> {
    match store.get(key)? {
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            RepoError::InvalidData(format!("invalid value `{raw}` for setting `{key}`"))
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemorySettings(RefCell<HashMap<String, String>>);

    impl SettingsStore for MemorySettings {
        fn get(&self, key: &str) -> RepoResult<Option<String>> {
            Ok(self.0.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> RepoResult<()> {
            self.0.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let store = MemorySettings::default();
        assert_eq!(MapSettings::load(&store).unwrap(), MapSettings::default());
    }

    #[test]
    fn setters_write_through_and_reload() {
        let store = MemorySettings::default();
        let mut settings = MapSettings::load(&store).unwrap();
        settings.set_last_category_id(&store, CategoryId(4)).unwrap();
        settings.set_map_rotation(&store, 42.5).unwrap();
        settings.set_tap_duration_mode(&store, true).unwrap();
        settings.set_snap_note_to_gps(&store, true).unwrap();

        let reloaded = MapSettings::load(&store).unwrap();
        assert_eq!(reloaded, settings);
        assert_eq!(reloaded.last_category_id, CategoryId(4));
    }

    #[test]
    fn malformed_values_are_invalid_data() {
        let store = MemorySettings::default();
        store.set(KEY_TAP_DURATION_MODE, "sometimes").unwrap();
        let err = MapSettings::load(&store).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
    }
}
