// This file is part of the product Notewell.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const NOTES_FILE_NAME: &str = "notes_data.json";

/// Canonical locations inside the runtime root. The notes file is allowed to
/// be absent: a missing file is the empty collection, created on first write.
#[derive(Debug, Clone)]
pub struct RuntimePaths {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub notes_file: PathBuf,
}

impl RuntimePaths {
    pub fn from_root(root: &Path) -> Result<Self, ConfigError> {
        let root_path = if root.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            root.to_path_buf()
        };

        if !root_path.exists() {
            fs::create_dir_all(&root_path).map_err(|e| {
                ConfigError::ValidationError(format!(
                    "Failed to create runtime root '{}': {}",
                    root_path.display(),
                    e
                ))
            })?;
        }

        let root_canonical = root_path.canonicalize().map_err(|e| {
            ConfigError::ValidationError(format!(
                "Failed to canonicalize runtime root '{}': {}",
                root_path.display(),
                e
            ))
        })?;

        ensure_dir_writable(&root_canonical, "Runtime root must be writable")?;

        let config_file = root_canonical.join("config.yaml");
        ensure_file_writable(&config_file, "Config file must be writable")?;

        let notes_file = root_canonical.join(NOTES_FILE_NAME);
        if notes_file.exists() {
            ensure_file_writable(&notes_file, "Notes file must be writable")?;
        }

        Ok(Self {
            root: root_canonical,
            config_file,
            notes_file,
        })
    }
}

fn ensure_dir_writable(path: &Path, context: &str) -> Result<(), ConfigError> {
    if !path.is_dir() {
        return Err(ConfigError::ValidationError(format!(
            "{} (not a directory): {}",
            context,
            path.display()
        )));
    }

    // A metadata check cannot see read-only mounts; probe with a real create.
    let probe_path = path.join(format!(".notewell-write-check-{}", Uuid::new_v4()));
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&probe_path)
        .map_err(|err| {
            ConfigError::ValidationError(format!("{} ({}): {}", context, path.display(), err))
        })?;

    fs::remove_file(&probe_path).map_err(|err| {
        ConfigError::ValidationError(format!(
            "{} (unable to clean probe file {}): {}",
            context,
            probe_path.display(),
            err
        ))
    })
}

fn ensure_file_writable(path: &Path, context: &str) -> Result<(), ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ValidationError(format!(
            "{} (not a file): {}",
            context,
            path.display()
        )));
    }

    match fs::OpenOptions::new().append(true).open(path) {
        Ok(_) => Ok(()),
        Err(err) => Err(ConfigError::ValidationError(format!(
            "{} ({}): {}",
            context,
            path.display(),
            err
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_fixtures::TestFixtureRoot;
    use std::fs;

    #[test]
    fn from_root_requires_a_config_file() {
        let fixture = TestFixtureRoot::new_unique("paths-no-config").expect("fixture root");
        let err = RuntimePaths::from_root(fixture.path()).unwrap_err();
        assert!(err.to_string().contains("Config file must be writable"));
    }

    #[test]
    fn from_root_accepts_a_prepared_root() {
        let fixture = TestFixtureRoot::new_unique("paths-prepared").expect("fixture root");
        fs::write(fixture.path().join("config.yaml"), "server:\n").expect("write config");

        let paths = RuntimePaths::from_root(fixture.path()).expect("runtime paths");
        assert!(paths.root.is_absolute());
        assert_eq!(
            paths.notes_file.file_name().and_then(|n| n.to_str()),
            Some(NOTES_FILE_NAME)
        );
        assert!(!paths.notes_file.exists());
    }

    #[test]
    fn from_root_rejects_a_directory_in_place_of_the_notes_file() {
        let fixture = TestFixtureRoot::new_unique("paths-notes-dir").expect("fixture root");
        fs::write(fixture.path().join("config.yaml"), "server:\n").expect("write config");
        fs::create_dir(fixture.path().join(NOTES_FILE_NAME)).expect("create dir");

        let err = RuntimePaths::from_root(fixture.path()).unwrap_err();
        assert!(err.to_string().contains("Notes file must be writable"));
    }

    #[test]
    fn from_root_creates_a_missing_root() {
        let fixture = TestFixtureRoot::new_unique("paths-new-root").expect("fixture root");
        let nested = fixture.path().join("nested").join("runtime");

        let err = RuntimePaths::from_root(&nested).unwrap_err();
        // Root creation succeeds; only the config file is missing at this point.
        assert!(nested.is_dir());
        assert!(err.to_string().contains("Config file must be writable"));
    }
}
