use svgnotes::{Config, NoteError, NoteStorage};

use tempfile::tempdir;

fn storage_in(dir: &std::path::Path) -> NoteStorage {
    NoteStorage::new(Config {
        notes_dir: dir.to_path_buf(),
        file_ext: "svg".to_string(),
    })
}

#[test]
fn note_lifecycle_from_create_to_delete() {
    let dir = tempdir().unwrap();
    // The notes directory does not exist yet; the first write creates it.
    let storage = storage_in(&dir.path().join("notes"));

    let created = storage.create_note("Groceries", "milk eggs bread").unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.title, "Groceries");
    assert_eq!(created.content, "milk eggs bread");

    let fetched = storage.get_note(1).unwrap();
    assert_eq!(fetched, created);

    let updated = storage
        .update_note(1, "Groceries v2", "milk eggs bread butter")
        .unwrap();
    assert_eq!(updated.id, 1);
    assert_eq!(updated.title, "Groceries v2");
    assert_eq!(updated.content, "milk eggs bread butter");
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(storage.get_note(1).unwrap(), updated);

    storage.delete_note(1).unwrap();
    assert!(matches!(
        storage.get_note(1),
        Err(NoteError::NoteNotFound { id: 1 })
    ));
}

#[test]
fn fresh_store_lists_empty_and_rejects_clear() {
    let dir = tempdir().unwrap();
    let storage = storage_in(dir.path());

    assert!(storage.list_notes().unwrap().is_empty());
    assert!(matches!(
        storage.delete_all_notes(),
        Err(NoteError::StoreEmpty)
    ));
}

#[test]
fn stored_documents_are_viewable_svg_files() {
    let dir = tempdir().unwrap();
    let storage = storage_in(dir.path());

    let note = storage.create_note("Groceries", "milk eggs bread").unwrap();
    let document = std::fs::read_to_string(dir.path().join(format!("{}.svg", note.id))).unwrap();

    // The record is a renderable image document, not just a data blob.
    assert!(document.starts_with("<svg"));
    assert!(document.contains("xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(document.contains("Groceries"));
    assert!(document.contains("Created:"));
}
