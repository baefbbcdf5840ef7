use geonotes_core::db::open_db_in_memory;
use geonotes_core::{CategoryId, GeoPoint, NoteGateway, NoteId, RepoError, SqliteNoteRepository};

#[test]
fn add_note_assigns_fresh_ids_that_are_never_reused() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::new(&conn);

    let first = repo.add_note("", 53.563, 9.9866, CategoryId(4)).unwrap();
    repo.remove_note(first).unwrap();
    let second = repo.add_note("", 53.563, 9.9866, CategoryId(4)).unwrap();

    assert_ne!(first, second);
    assert!(second > first);
}

#[test]
fn updates_are_visible_in_read_back() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::new(&conn);
    let id = repo.add_note("kiosk", 53.5, 9.9, CategoryId(1)).unwrap();

    repo.update_description(id, "kiosk, closed on sundays").unwrap();
    repo.update_location(id, GeoPoint::new(53.55, 9.95)).unwrap();
    repo.update_category(id, CategoryId(7)).unwrap();

    let note = repo.get_note(id).unwrap().unwrap();
    assert_eq!(note.description, "kiosk, closed on sundays");
    assert_eq!(note.position(), GeoPoint::new(53.55, 9.95));
    assert_eq!(note.category_id, CategoryId(7));
    assert_eq!(repo.all_notes().unwrap(), vec![note]);
}

#[test]
fn writes_to_unknown_notes_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::new(&conn);
    let missing = NoteId(404);

    assert!(matches!(
        repo.update_description(missing, "x"),
        Err(RepoError::NoteNotFound(id)) if id == missing
    ));
    assert!(matches!(
        repo.remove_note(missing),
        Err(RepoError::NoteNotFound(_))
    ));
    assert!(matches!(
        repo.add_photo(missing, "a.jpg"),
        Err(RepoError::NoteNotFound(_))
    ));
    assert!(repo.get_note(missing).unwrap().is_none());
}

#[test]
fn unknown_category_is_rejected_by_storage() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::new(&conn);
    assert!(repo.add_note("", 1.0, 1.0, CategoryId(999)).is_err());
}

#[test]
fn remove_photos_deletes_files_and_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::new(&conn);
    let dir = tempfile::tempdir().unwrap();
    let id = repo.add_note("", 1.0, 1.0, CategoryId(1)).unwrap();
    let other = repo.add_note("", 2.0, 2.0, CategoryId(1)).unwrap();

    for name in ["a.jpg", "b.jpg"] {
        std::fs::write(dir.path().join(name), b"jpeg").unwrap();
        repo.add_photo(id, name).unwrap();
    }
    std::fs::write(dir.path().join("c.jpg"), b"jpeg").unwrap();
    repo.add_photo(other, "c.jpg").unwrap();
    // Registered but already gone from disk.
    repo.add_photo(id, "missing.jpg").unwrap();

    assert!(repo.has_photos(id).unwrap());
    assert_eq!(
        repo.photos_for(id).unwrap(),
        vec!["a.jpg", "b.jpg", "missing.jpg"]
    );

    repo.remove_photos(id, dir.path()).unwrap();

    assert!(!repo.has_photos(id).unwrap());
    assert!(!dir.path().join("a.jpg").exists());
    assert!(!dir.path().join("b.jpg").exists());
    assert!(dir.path().join("c.jpg").exists());
    assert!(repo.has_photos(other).unwrap());
}

#[test]
fn photo_names_must_be_bare_file_names() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::new(&conn);
    let id = repo.add_note("", 1.0, 1.0, CategoryId(1)).unwrap();

    for name in ["", "  ", "../escape.jpg", "dir\\x.jpg"] {
        assert!(matches!(
            repo.add_photo(id, name),
            Err(RepoError::InvalidData(_))
        ));
    }
}

#[test]
fn removing_a_note_cascades_to_photo_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::new(&conn);
    let id = repo.add_note("", 1.0, 1.0, CategoryId(1)).unwrap();
    repo.add_photo(id, "a.jpg").unwrap();

    repo.remove_note(id).unwrap();

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM photos;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}
