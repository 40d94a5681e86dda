// This file is part of the product Notewell.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub(crate) const MAX_TEMP_ATTEMPTS: u32 = 100;

#[derive(Debug)]
pub(crate) struct JsonStoreError {
    message: String,
}

impl JsonStoreError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for JsonStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for JsonStoreError {}

/// Reads a whole-file JSON document. A missing or blank file is `Ok(None)`;
/// unreadable or unparseable contents are errors, never an empty value.
pub(crate) fn read_json_file<T: DeserializeOwned>(
    path: &Path,
    label: &str,
) -> Result<Option<T>, JsonStoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|err| JsonStoreError::new(format!("Failed to read {} file: {}", label, err)))?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    let decoded = serde_json::from_str(&content)
        .map_err(|err| JsonStoreError::new(format!("Failed to parse {} file: {}", label, err)))?;
    Ok(Some(decoded))
}

/// Serializes `value` as pretty-printed JSON and replaces the file atomically.
pub(crate) fn write_json_file<T: Serialize>(
    path: &Path,
    label: &str,
    value: &T,
) -> Result<(), JsonStoreError> {
    let content = serde_json::to_string_pretty(value)
        .map_err(|err| JsonStoreError::new(format!("Failed to serialize {}: {}", label, err)))?;
    replace_file_atomic(path, label, content.as_bytes())
}

/// Writes `bytes` to a sibling temp file, fsyncs it, then renames it over the
/// target so readers only ever see the old or the new contents.
fn replace_file_atomic(path: &Path, label: &str, bytes: &[u8]) -> Result<(), JsonStoreError> {
    let parent = path.parent().ok_or_else(|| {
        JsonStoreError::new(format!("{} file path has no parent directory", label))
    })?;
    let (file, temp_path) = open_temp_file(path, parent, label)?;

    let written = write_and_sync(file, bytes).and_then(|_| fs::rename(&temp_path, path));
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(JsonStoreError::new(format!(
            "Failed to replace {} file: {}",
            label, err
        )));
    }

    #[cfg(unix)]
    {
        if let Err(err) = sync_parent_dir(parent) {
            log::warn!("Directory sync after {} write failed: {}", label, err);
        }
    }

    Ok(())
}

fn write_and_sync(mut file: fs::File, bytes: &[u8]) -> Result<(), std::io::Error> {
    file.write_all(bytes)?;
    file.sync_all()
}

/// Creates `.{name}.tmp.{pid}.{attempt}` next to the target, carrying over the
/// target's permissions when it already exists.
fn open_temp_file(
    path: &Path,
    parent: &Path,
    label: &str,
) -> Result<(fs::File, PathBuf), JsonStoreError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| JsonStoreError::new(format!("{} file path has no valid name", label)))?;

    for attempt in 0..MAX_TEMP_ATTEMPTS {
        let temp_path = parent.join(format!(
            ".{}.tmp.{}.{}",
            file_name,
            std::process::id(),
            attempt
        ));
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
        {
            Ok(file) => {
                #[cfg(unix)]
                if let Ok(metadata) = fs::metadata(path) {
                    if let Err(err) = fs::set_permissions(&temp_path, metadata.permissions()) {
                        let _ = fs::remove_file(&temp_path);
                        return Err(JsonStoreError::new(format!(
                            "Failed to set temp {} file permissions: {}",
                            label, err
                        )));
                    }
                }
                return Ok((file, temp_path));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(err) => {
                return Err(JsonStoreError::new(format!(
                    "Failed to create temp {} file: {}",
                    label, err
                )));
            }
        }
    }
    Err(JsonStoreError::new(format!(
        "Failed to create temp {} file after multiple attempts",
        label
    )))
}

#[cfg(unix)]
fn sync_parent_dir(parent: &Path) -> Result<(), std::io::Error> {
    let dir = fs::File::open(parent)?;
    dir.sync_all()
}
