//! Note gateway contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist notes keyed by storage-assigned ids.
//! - Track photo file names attached to notes and delete them on request.
//!
//! # Invariants
//! - `add_note` is the only way a `NoteId` comes into existence.
//! - Updates and deletes of unknown ids return `RepoError::NoteNotFound`.
//! - Photo rows are removed together with their files.

use crate::model::category::CategoryId;
use crate::model::geo::GeoPoint;
use crate::model::note::{Note, NoteId};
use crate::repo::{RepoError, RepoResult};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::io::ErrorKind;
use std::path::Path;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    description,
    lat,
    lon,
    category_id
FROM notes";

/// Durable store of notes and their photos.
pub trait NoteGateway {
    /// Creates one note and returns its new stable id.
    fn add_note(
        &self,
        description: &str,
        lat: f64,
        lon: f64,
        category_id: CategoryId,
    ) -> RepoResult<NoteId>;
    fn update_description(&self, id: NoteId, text: &str) -> RepoResult<()>;
    fn update_location(&self, id: NoteId, position: GeoPoint) -> RepoResult<()>;
    fn update_category(&self, id: NoteId, category_id: CategoryId) -> RepoResult<()>;
    fn remove_note(&self, id: NoteId) -> RepoResult<()>;
    /// Deletes all photo files of `id` from `directory` and forgets them.
    fn remove_photos(&self, id: NoteId, directory: &Path) -> RepoResult<()>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    fn all_notes(&self) -> RepoResult<Vec<Note>>;
    /// Registers a captured photo file for `id`.
    fn add_photo(&self, id: NoteId, file_name: &str) -> RepoResult<()>;
    /// Returns photo file names of `id` in capture order.
    fn photos_for(&self, id: NoteId) -> RepoResult<Vec<String>>;
    fn has_photos(&self, id: NoteId) -> RepoResult<bool>;
}

impl<G: NoteGateway + ?Sized> NoteGateway for &G {
    fn add_note(
        &self,
        description: &str,
        lat: f64,
        lon: f64,
        category_id: CategoryId,
    ) -> RepoResult<NoteId> {
        (**self).add_note(description, lat, lon, category_id)
    }

    fn update_description(&self, id: NoteId, text: &str) -> RepoResult<()> {
        (**self).update_description(id, text)
    }

    fn update_location(&self, id: NoteId, position: GeoPoint) -> RepoResult<()> {
        (**self).update_location(id, position)
    }

    fn update_category(&self, id: NoteId, category_id: CategoryId) -> RepoResult<()> {
        (**self).update_category(id, category_id)
    }

    fn remove_note(&self, id: NoteId) -> RepoResult<()> {
        (**self).remove_note(id)
    }

    fn remove_photos(&self, id: NoteId, directory: &Path) -> RepoResult<()> {
        (**self).remove_photos(id, directory)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        (**self).get_note(id)
    }

    fn all_notes(&self) -> RepoResult<Vec<Note>> {
        (**self).all_notes()
    }

    fn add_photo(&self, id: NoteId, file_name: &str) -> RepoResult<()> {
        (**self).add_photo(id, file_name)
    }

    fn photos_for(&self, id: NoteId) -> RepoResult<Vec<String>> {
        (**self).photos_for(id)
    }

    fn has_photos(&self, id: NoteId) -> RepoResult<bool> {
        (**self).has_photos(id)
    }
}

/// SQLite-backed note gateway.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Wraps a migrated connection (see `db::open_db`).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn expect_changed(&self, changed: usize, id: NoteId) -> RepoResult<()> {
        if changed == 0 {
            return Err(RepoError::NoteNotFound(id));
        }
        Ok(())
    }
}

impl NoteGateway for SqliteNoteRepository<'_> {
    fn add_note(
        &self,
        description: &str,
        lat: f64,
        lon: f64,
        category_id: CategoryId,
    ) -> RepoResult<NoteId> {
        self.conn.execute(
            "INSERT INTO notes (description, lat, lon, category_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![description, lat, lon, category_id.get()],
        )?;
        Ok(NoteId(self.conn.last_insert_rowid()))
    }

    fn update_description(&self, id: NoteId, text: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                description = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id.get(), text],
        )?;
        self.expect_changed(changed, id)
    }

    fn update_location(&self, id: NoteId, position: GeoPoint) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                lat = ?2,
                lon = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id.get(), position.lat, position.lon],
        )?;
        self.expect_changed(changed, id)
    }

    fn update_category(&self, id: NoteId, category_id: CategoryId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                category_id = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id.get(), category_id.get()],
        )?;
        self.expect_changed(changed, id)
    }

    fn remove_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id.get()])?;
        self.expect_changed(changed, id)
    }

    fn remove_photos(&self, id: NoteId, directory: &Path) -> RepoResult<()> {
        for file_name in self.photos_for(id)? {
            match std::fs::remove_file(directory.join(&file_name)) {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    warn!("event=photo_remove module=repo status=skipped note_id={id} reason=file_missing");
                }
                Err(err) => return Err(err.into()),
            }
        }

        self.conn
            .execute("DELETE FROM photos WHERE note_id = ?1;", [id.get()])?;
        Ok(())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let note = self
            .conn
            .query_row(
                &format!("{NOTE_SELECT_SQL} WHERE id = ?1;"),
                [id.get()],
                |row| Ok(parse_note_row(row)),
            )
            .optional()?;
        note.transpose()
    }

    fn all_notes(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn add_photo(&self, id: NoteId, file_name: &str) -> RepoResult<()> {
        let trimmed = file_name.trim();
        if trimmed.is_empty() || trimmed.contains(['/', '\\']) {
            return Err(RepoError::InvalidData(format!(
                "photo file name must be a bare file name, got `{file_name}`"
            )));
        }
        if self.get_note(id)?.is_none() {
            return Err(RepoError::NoteNotFound(id));
        }
        self.conn.execute(
            "INSERT INTO photos (note_id, file_name) VALUES (?1, ?2);",
            params![id.get(), trimmed],
        )?;
        Ok(())
    }

    fn photos_for(&self, id: NoteId) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT file_name FROM photos WHERE note_id = ?1 ORDER BY id ASC;")?;
        let mut rows = stmt.query([id.get()])?;
        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            names.push(row.get(0)?);
        }
        Ok(names)
    }

    fn has_photos(&self, id: NoteId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM photos WHERE note_id = ?1);",
            [id.get()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id = NoteId(row.get("id")?);
    let lat: f64 = row.get("lat")?;
    let lon: f64 = row.get("lon")?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(RepoError::InvalidData(format!(
            "note {id} has out-of-range position ({lat}, {lon})"
        )));
    }

    Ok(Note {
        id,
        lat,
        lon,
        description: row.get("description")?,
        category_id: CategoryId(row.get("category_id")?),
    })
}
