// This file is part of the product Notewell.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

pub const MAX_TITLE_CHARS: usize = 256;
pub const MAX_CONTENT_CHARS: usize = 65536;
pub const MAX_TAGS_PER_NOTE: usize = 100;
pub const MAX_TAG_CHARS: usize = 128;

/// A stored note. `title` and `content` are kept trimmed; `tags` are free-text
/// labels preserved verbatim and in order. Records written before tags existed
/// load with an empty list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Create-request body. Title and content are required but arrive as options
/// so a missing field is reported as a validation failure, not a decode error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Update-request body. Only fields that are present are applied; a JSON
/// `null` counts as absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct NoteValidationError {
    message: String,
}

impl NoteValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for NoteValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for NoteValidationError {}

/// Validates a field that must be present and non-blank; returns the trimmed
/// value on success.
pub(crate) fn validate_required_text(
    value: Option<&str>,
    field: &str,
    max_chars: usize,
) -> Result<String, NoteValidationError> {
    match value {
        None => Err(NoteValidationError::new(format!("{} is required", field))),
        Some(raw) => validate_text(raw, field, max_chars),
    }
}

/// Validates a field that may be absent; absent stays absent, present values
/// get the same checks as on create.
pub(crate) fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_chars: usize,
) -> Result<Option<String>, NoteValidationError> {
    match value {
        None => Ok(None),
        Some(raw) => validate_text(raw, field, max_chars).map(Some),
    }
}

fn validate_text(raw: &str, field: &str, max_chars: usize) -> Result<String, NoteValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NoteValidationError::new(format!(
            "{} cannot be empty",
            field
        )));
    }
    if char_count(trimmed) > max_chars {
        return Err(NoteValidationError::new(format!(
            "{} must be at most {} characters",
            field, max_chars
        )));
    }
    Ok(trimmed.to_string())
}

/// Tag values are stored as given, but blank entries and oversized labels are
/// rejected up front.
pub(crate) fn validate_tags(tags: &[String]) -> Result<(), NoteValidationError> {
    if tags.len() > MAX_TAGS_PER_NOTE {
        return Err(NoteValidationError::new(format!(
            "A note can have at most {} tags",
            MAX_TAGS_PER_NOTE
        )));
    }
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(NoteValidationError::new(
                "Tags cannot contain empty values".to_string(),
            ));
        }
        if char_count(tag) > MAX_TAG_CHARS {
            return Err(NoteValidationError::new(format!(
                "Tags must be at most {} characters",
                MAX_TAG_CHARS
            )));
        }
    }
    Ok(())
}

fn char_count(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_missing_field() {
        let err = validate_required_text(None, "Title", MAX_TITLE_CHARS).unwrap_err();
        assert_eq!(err.to_string(), "Title is required");
    }

    #[test]
    fn required_text_rejects_blank_field() {
        let err = validate_required_text(Some("   \t"), "Content", MAX_CONTENT_CHARS).unwrap_err();
        assert_eq!(err.to_string(), "Content cannot be empty");
    }

    #[test]
    fn required_text_trims_surrounding_whitespace() {
        let value = validate_required_text(Some("  Groceries \n"), "Title", MAX_TITLE_CHARS)
            .expect("valid title");
        assert_eq!(value, "Groceries");
    }

    #[test]
    fn required_text_rejects_oversized_field() {
        let raw = "x".repeat(MAX_TITLE_CHARS + 1);
        let err = validate_required_text(Some(&raw), "Title", MAX_TITLE_CHARS).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Title must be at most {} characters", MAX_TITLE_CHARS)
        );
    }

    #[test]
    fn required_text_counts_chars_not_bytes() {
        let raw = "ü".repeat(MAX_TITLE_CHARS);
        let value = validate_required_text(Some(&raw), "Title", MAX_TITLE_CHARS)
            .expect("exactly at the limit");
        assert_eq!(value.chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn optional_text_passes_through_absent() {
        let value =
            validate_optional_text(None, "Title", MAX_TITLE_CHARS).expect("absent is valid");
        assert!(value.is_none());
    }

    #[test]
    fn optional_text_rejects_blank_value() {
        let err = validate_optional_text(Some(""), "Title", MAX_TITLE_CHARS).unwrap_err();
        assert_eq!(err.to_string(), "Title cannot be empty");
    }

    #[test]
    fn tags_reject_blank_entries() {
        let tags = vec!["home".to_string(), "  ".to_string()];
        let err = validate_tags(&tags).unwrap_err();
        assert_eq!(err.to_string(), "Tags cannot contain empty values");
    }

    #[test]
    fn tags_reject_oversized_entries() {
        let tags = vec!["x".repeat(MAX_TAG_CHARS + 1)];
        assert!(validate_tags(&tags).is_err());
    }

    #[test]
    fn tags_reject_oversized_lists() {
        let tags = vec!["t".to_string(); MAX_TAGS_PER_NOTE + 1];
        assert!(validate_tags(&tags).is_err());
    }

    #[test]
    fn tags_keep_values_verbatim() {
        let tags = vec![" spaced ".to_string(), "UPPER".to_string()];
        assert!(validate_tags(&tags).is_ok());
    }

    #[test]
    fn note_without_tags_field_loads_with_empty_list() {
        let raw = r#"{
            "id": "abc",
            "title": "t",
            "content": "c",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        }"#;
        let note: Note = serde_json::from_str(raw).expect("legacy record");
        assert!(note.tags.is_empty());
    }

    #[test]
    fn patch_treats_null_fields_as_absent() {
        let patch: NotePatch =
            serde_json::from_str(r#"{"title": null, "content": null}"#).expect("valid patch");
        assert!(patch.title.is_none());
        assert!(patch.content.is_none());
        assert!(patch.tags.is_none());
    }
}
