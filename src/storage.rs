use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use log::{debug, error, info, trace, warn};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::{parse_note, render_note, Config, Note, NoteError, Result};

/// Bounds enforced on caller-supplied fields. Validation proper belongs to
/// the caller; the store re-checks so bad input can never reach the encoder.
const TITLE_MIN: usize = 2;
const TITLE_MAX: usize = 50;
const CONTENT_MIN: usize = 2;
const CONTENT_MAX: usize = 200;

/// Manages the storage, retrieval and search of notes.
///
/// Owns one flat directory holding one SVG document per note, named
/// `<id>.<ext>`. The directory listing is the entire index; there is no
/// companion manifest.
pub struct NoteStorage {
    /// Application configuration
    config: Config,

    /// Serializes id allocation with record creation, so two concurrent
    /// creators can never compute the same next id.
    alloc_lock: Mutex<()>,
}

impl NoteStorage {
    /// Creates a new NoteStorage instance with the provided configuration.
    ///
    /// The notes directory is not touched here; reads treat a missing
    /// directory as an empty store and writes create it on first use.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            alloc_lock: Mutex::new(()),
        }
    }

    /// The directory this store reads and writes.
    pub fn notes_dir(&self) -> &Path {
        &self.config.notes_dir
    }

    /// Helper method to get the file path for a note
    fn note_path(&self, id: u64) -> PathBuf {
        self.config
            .notes_dir
            .join(format!("{}.{}", id, self.config.file_ext))
    }

    /// Ensures the notes directory exists, creating it if needed.
    fn ensure_notes_dir(&self) -> Result<()> {
        if !self.config.notes_dir.exists() {
            debug!(
                "Notes directory does not exist, creating: {}",
                self.config.notes_dir.display()
            );
            fs::create_dir_all(&self.config.notes_dir).map_err(|e| {
                error!("Failed to create notes directory: {}", e);
                NoteError::StoreUnavailable {
                    path: self.config.notes_dir.clone(),
                    message: e.to_string(),
                }
            })?;
        }
        Ok(())
    }

    /// Lists the ids of all stored notes, sorted numerically ascending.
    ///
    /// Directory order is never trusted: entries are parsed and sorted, so
    /// `10` sorts after `9` rather than after `1`. A missing directory is an
    /// empty store; any other directory failure is `StoreUnavailable`. A
    /// record filename whose stem is not an integer is `MalformedRecord`.
    pub fn list_ids(&self) -> Result<Vec<u64>> {
        if !self.config.notes_dir.exists() {
            debug!(
                "Notes directory {} does not exist, treating store as empty",
                self.config.notes_dir.display()
            );
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in WalkDir::new(&self.config.notes_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                error!("Failed to read notes directory: {}", e);
                NoteError::StoreUnavailable {
                    path: self.config.notes_dir.clone(),
                    message: e.to_string(),
                }
            })?;

            let path = entry.path();
            // Only note documents count; the directory may hold other files.
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str())
                    != Some(self.config.file_ext.as_str())
            {
                trace!("Skipping non-record entry: {}", path.display());
                continue;
            }

            let stem = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default();
            let id: u64 = stem.parse().map_err(|_| {
                error!("Record filename is not a note id: {}", path.display());
                NoteError::MalformedRecord {
                    path: path.to_path_buf(),
                    message: "filename is not a numeric id".to_string(),
                }
            })?;
            ids.push(id);
        }

        ids.sort_unstable();
        debug!("Store holds {} notes", ids.len());
        Ok(ids)
    }

    /// Returns the id the next created note will receive: 1 for an empty
    /// store, otherwise the highest existing id plus one.
    pub fn next_id(&self) -> Result<u64> {
        let ids = self.list_ids()?;
        Ok(ids.last().map_or(1, |max| max + 1))
    }

    /// Returns true iff a record file for this id is present.
    pub fn note_exists(&self, id: u64) -> bool {
        self.note_path(id).is_file()
    }

    /// Creates a new note from the given fields and persists it.
    ///
    /// The id is allocated under the allocation lock and the record file is
    /// created exclusively, so a racing creator fails with `WriteFailure`
    /// instead of silently overwriting.
    ///
    /// # Returns
    ///
    /// The stored note, including its assigned id and creation timestamp.
    pub fn create_note(&self, title: &str, content: &str) -> Result<Note> {
        let (title, content) = validate_fields(title, content)?;
        self.ensure_notes_dir()?;

        let _guard = self
            .alloc_lock
            .lock()
            .map_err(|e| NoteError::LockAcquisitionFailed {
                message: format!("Failed to acquire id allocation lock: {}", e),
            })?;

        let id = self.next_id()?;
        let note = Note::new(id, title, content);
        debug!("Allocated id {} for new note '{}'", note.id, note.title);

        let document = render_note(&note);
        self.write_record(note.id, &document, true)?;

        info!("Created note {}", note.id);
        Ok(note)
    }

    /// Retrieves a note by its ID from the storage.
    ///
    /// Returns `NoteNotFound` when no record file exists and
    /// `MalformedRecord` when the file exists but cannot be decoded.
    pub fn get_note(&self, id: u64) -> Result<Note> {
        debug!("Retrieving note by ID: {}", id);

        if !self.note_exists(id) {
            debug!("Note not found: {}", id);
            return Err(NoteError::NoteNotFound { id });
        }

        let file_path = self.note_path(id);
        let document = fs::read_to_string(&file_path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                // Deleted between the existence check and the read.
                NoteError::NoteNotFound { id }
            } else {
                error!("Failed to read note file {}: {}", file_path.display(), e);
                NoteError::Io(e)
            }
        })?;

        parse_note(id, &file_path, &document)
    }

    /// Retrieves all notes in ascending id order.
    ///
    /// An empty (or absent) store yields an empty Vec. A single record that
    /// fails to decode aborts the whole listing with `MalformedRecord`:
    /// corruption is surfaced to the caller, never skipped.
    pub fn list_notes(&self) -> Result<Vec<Note>> {
        let ids = self.list_ids()?;
        let mut notes = Vec::with_capacity(ids.len());
        for id in ids {
            notes.push(self.get_note(id)?);
        }
        info!("Listed {} notes", notes.len());
        Ok(notes)
    }

    /// Searches notes by title and content.
    ///
    /// A note matches when its title or content contains the query,
    /// case-insensitively. Scans the full listing; zero matches is an empty
    /// Vec, not an error.
    pub fn search_notes(&self, query: &str) -> Result<Vec<Note>> {
        info!("Searching notes with query: '{}'", query);

        let needle = query.to_lowercase();
        let matches: Vec<Note> = self
            .list_notes()?
            .into_iter()
            .filter(|note| {
                note.title.to_lowercase().contains(&needle)
                    || note.content.to_lowercase().contains(&needle)
            })
            .collect();

        info!("Found {} notes matching '{}'", matches.len(), query);
        Ok(matches)
    }

    /// Replaces the title and content of an existing note.
    ///
    /// The whole document is rewritten under the same id and filename. The
    /// original creation timestamp is preserved; it is immutable for the
    /// lifetime of the note.
    pub fn update_note(&self, id: u64, title: &str, content: &str) -> Result<Note> {
        info!("Updating note: {}", id);

        let (title, content) = validate_fields(title, content)?;
        let existing = self.get_note(id)?;

        let note = Note {
            id,
            title,
            content,
            created_at: existing.created_at,
        };
        let document = render_note(&note);
        self.write_record(id, &document, false)?;

        info!("Note {} updated successfully", id);
        Ok(note)
    }

    /// Deletes a note by its ID.
    ///
    /// Returns `NoteNotFound` when no such record exists; never touches any
    /// other file.
    pub fn delete_note(&self, id: u64) -> Result<()> {
        info!("Deleting note: {}", id);

        if !self.note_exists(id) {
            debug!("Cannot delete note {}: not found", id);
            return Err(NoteError::NoteNotFound { id });
        }

        let file_path = self.note_path(id);
        fs::remove_file(&file_path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                NoteError::NoteNotFound { id }
            } else {
                error!("Failed to delete note file {}: {}", file_path.display(), e);
                NoteError::Io(e)
            }
        })?;

        info!("Note {} deleted", id);
        Ok(())
    }

    /// Deletes every note in the store.
    ///
    /// # Returns
    ///
    /// The number of notes deleted, or `StoreEmpty` when there was nothing
    /// to delete.
    pub fn delete_all_notes(&self) -> Result<usize> {
        let ids = self.list_ids()?;
        if ids.is_empty() {
            debug!("Delete-all requested on an empty store");
            return Err(NoteError::StoreEmpty);
        }

        let mut deleted = 0;
        for id in ids {
            match self.delete_note(id) {
                Ok(()) => deleted += 1,
                Err(NoteError::NoteNotFound { .. }) => {
                    // Raced with another deleter; the record is gone either way.
                    warn!("Note {} disappeared during delete-all", id);
                }
                Err(e) => return Err(e),
            }
        }

        info!("Deleted {} notes", deleted);
        Ok(deleted)
    }

    /// Persists a document for the given id using atomic operations.
    ///
    /// The document is written to a temporary file in the notes directory
    /// and renamed into place, so readers never observe a partial record and
    /// a failed write leaves nothing behind. With `exclusive` set, an
    /// already-existing record makes the rename fail instead of replacing it.
    fn write_record(&self, id: u64, document: &str, exclusive: bool) -> Result<()> {
        let file_path = self.note_path(id);
        let dir = file_path.parent().unwrap_or_else(|| Path::new("."));

        debug!("Creating temporary file in directory: {}", dir.display());
        let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            NoteError::WriteFailure {
                path: file_path.clone(),
                message: e.to_string(),
            }
        })?;

        temp_file.write_all(document.as_bytes()).map_err(|e| {
            error!("Failed to write to temporary file: {}", e);
            NoteError::WriteFailure {
                path: file_path.clone(),
                message: e.to_string(),
            }
        })?;

        temp_file.flush().map_err(|e| {
            error!("Failed to flush temporary file: {}", e);
            NoteError::WriteFailure {
                path: file_path.clone(),
                message: e.to_string(),
            }
        })?;

        debug!("Performing atomic move of temporary file to final location");
        let persisted = if exclusive {
            temp_file.persist_noclobber(&file_path)
        } else {
            temp_file.persist(&file_path)
        };
        persisted.map_err(|e| {
            error!("Failed to persist file {}: {}", file_path.display(), e.error);
            NoteError::WriteFailure {
                path: file_path.clone(),
                message: e.error.to_string(),
            }
        })?;

        trace!("Record {} persisted", file_path.display());
        Ok(())
    }
}

/// Re-checks caller-supplied fields against the store's bounds.
fn validate_fields(title: &str, content: &str) -> Result<(String, String)> {
    let title = title.trim();
    let content = content.trim();

    let title_len = title.chars().count();
    let content_len = content.chars().count();

    if title_len < TITLE_MIN {
        return Err(NoteError::InvalidInput {
            message: format!("Note title cannot be less than {} characters", TITLE_MIN),
        });
    }
    if title_len > TITLE_MAX {
        return Err(NoteError::InvalidInput {
            message: format!("Note title cannot be longer than {} characters", TITLE_MAX),
        });
    }
    if content_len < CONTENT_MIN {
        return Err(NoteError::InvalidInput {
            message: format!("Note content cannot be less than {} characters", CONTENT_MIN),
        });
    }
    if content_len > CONTENT_MAX {
        return Err(NoteError::InvalidInput {
            message: format!("Note content cannot be longer than {} characters", CONTENT_MAX),
        });
    }

    Ok((title.to_string(), content.to_string()))
}
