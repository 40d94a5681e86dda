// This file is part of the product Notewell.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::json_store::{JsonStoreError, read_json_file, write_json_file};
use super::model::{
    MAX_CONTENT_CHARS, MAX_TITLE_CHARS, Note, NoteDraft, NotePatch, NoteValidationError,
    validate_optional_text, validate_required_text, validate_tags,
};
use chrono::Utc;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const NOTES_FILE_LABEL: &str = "notes";

/// File-backed note collection. Every operation reads the full file and every
/// mutation rewrites it; nothing is cached between calls. Mutations are
/// serialized by the writer lock so two handlers cannot interleave their
/// load/persist cycles and drop each other's changes.
pub struct NoteStore {
    notes_file: PathBuf,
    write_lock: Mutex<()>,
}

#[derive(Debug)]
pub enum NoteStoreError {
    Validation(String),
    NotFound,
    Storage(String),
}

impl fmt::Display for NoteStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteStoreError::Validation(message) => write!(f, "{}", message),
            NoteStoreError::NotFound => write!(f, "Note not found"),
            NoteStoreError::Storage(message) => write!(f, "{}", message),
        }
    }
}

impl Error for NoteStoreError {}

impl From<NoteValidationError> for NoteStoreError {
    fn from(err: NoteValidationError) -> Self {
        NoteStoreError::Validation(err.to_string())
    }
}

impl From<JsonStoreError> for NoteStoreError {
    fn from(err: JsonStoreError) -> Self {
        NoteStoreError::Storage(err.to_string())
    }
}

impl NoteStore {
    pub fn new(notes_file: PathBuf) -> Self {
        Self {
            notes_file,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns all notes in stored order (which is creation order).
    pub fn list(&self) -> Result<Vec<Note>, NoteStoreError> {
        self.load()
    }

    pub fn create(&self, draft: NoteDraft) -> Result<Note, NoteStoreError> {
        let title = validate_required_text(draft.title.as_deref(), "Title", MAX_TITLE_CHARS)?;
        let content =
            validate_required_text(draft.content.as_deref(), "Content", MAX_CONTENT_CHARS)?;
        validate_tags(&draft.tags)?;

        let _guard = self.lock_for_write()?;
        let mut notes = self.load()?;
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            created_at: now,
            updated_at: now,
            tags: draft.tags,
        };
        notes.push(note.clone());
        self.persist(&notes)?;
        Ok(note)
    }

    /// Applies the present fields of `patch` to the first note matching `id`.
    /// `updated_at` is reset even when the patch carries no recognized fields.
    pub fn update(&self, id: &str, patch: NotePatch) -> Result<Note, NoteStoreError> {
        let title = validate_optional_text(patch.title.as_deref(), "Title", MAX_TITLE_CHARS)?;
        let content =
            validate_optional_text(patch.content.as_deref(), "Content", MAX_CONTENT_CHARS)?;
        if let Some(tags) = patch.tags.as_deref() {
            validate_tags(tags)?;
        }

        let _guard = self.lock_for_write()?;
        let mut notes = self.load()?;
        let position = notes
            .iter()
            .position(|note| note.id == id)
            .ok_or(NoteStoreError::NotFound)?;

        let note = &mut notes[position];
        if let Some(title) = title {
            note.title = title;
        }
        if let Some(content) = content {
            note.content = content;
        }
        if let Some(tags) = patch.tags {
            note.tags = tags;
        }
        note.updated_at = Utc::now();
        let updated = note.clone();

        self.persist(&notes)?;
        Ok(updated)
    }

    /// Removes the first note matching `id` and returns it.
    pub fn delete(&self, id: &str) -> Result<Note, NoteStoreError> {
        let _guard = self.lock_for_write()?;
        let mut notes = self.load()?;
        let position = notes
            .iter()
            .position(|note| note.id == id)
            .ok_or(NoteStoreError::NotFound)?;
        let removed = notes.remove(position);
        self.persist(&notes)?;
        Ok(removed)
    }

    /// Case-insensitive substring search over title and content. Tags are not
    /// searched. An empty result is not an error.
    pub fn search(&self, query: &str) -> Result<Vec<Note>, NoteStoreError> {
        if query.is_empty() {
            return Err(NoteStoreError::Validation(
                "Search query is required".to_string(),
            ));
        }
        let needle = query.to_lowercase();
        let notes = self.load()?;
        Ok(notes
            .into_iter()
            .filter(|note| {
                note.title.to_lowercase().contains(&needle)
                    || note.content.to_lowercase().contains(&needle)
            })
            .collect())
    }

    fn lock_for_write(&self) -> Result<MutexGuard<'_, ()>, NoteStoreError> {
        self.write_lock
            .lock()
            .map_err(|_| NoteStoreError::Storage("Note store lock poisoned".to_string()))
    }

    fn load(&self) -> Result<Vec<Note>, NoteStoreError> {
        Ok(read_json_file(&self.notes_file, NOTES_FILE_LABEL)?.unwrap_or_default())
    }

    fn persist(&self, notes: &[Note]) -> Result<(), NoteStoreError> {
        write_json_file(&self.notes_file, NOTES_FILE_LABEL, &notes)?;
        Ok(())
    }
}
