// This file is part of the product Notewell.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const DEFAULT_HTTP_PORT: u16 = 7090;
const DEFAULT_WORKERS: u16 = 4;

/// Writes a default `config.yaml` on first run. Returns `true` when a file
/// was created, `false` when one already existed.
pub fn ensure_config(root: &Path) -> Result<bool, BootstrapError> {
    let root_path = normalize_root(root)?;
    let config_path = root_path.join("config.yaml");

    if config_path.exists() {
        return Ok(false);
    }

    let contents = default_config_yaml();

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&config_path)
    {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(BootstrapError::Io(err)),
    };

    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    log_action(format!("created config.yaml (http port {})", DEFAULT_HTTP_PORT));

    Ok(true)
}

fn normalize_root(root: &Path) -> Result<PathBuf, BootstrapError> {
    let root_path = if root.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        root.to_path_buf()
    };

    if root_path.exists() {
        if !root_path.is_dir() {
            return Err(BootstrapError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Runtime root is not a directory: {}", root_path.display()),
            )));
        }
        return Ok(root_path);
    }

    fs::create_dir_all(&root_path)?;
    log_action(format!(
        "created runtime root directory {}",
        root_path.display()
    ));
    Ok(root_path)
}

fn default_config_yaml() -> String {
    format!(
        "server:\n  host: \"0.0.0.0\"\n  port: {port}\n  workers: {workers}\n\nlogging:\n  level: \"info\"\n\napp:\n  name: \"Notewell\"\n  description: \"A lightweight personal notes service\"\n",
        port = DEFAULT_HTTP_PORT,
        workers = DEFAULT_WORKERS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_fixtures::TestFixtureRoot;

    #[test]
    fn default_config_contains_expected_port() {
        let yaml = default_config_yaml();
        assert!(yaml.contains("port: 7090"));
        assert!(yaml.contains("workers: 4"));
    }

    #[test]
    fn default_config_parses_and_validates() {
        let fixture = TestFixtureRoot::new_unique("bootstrap-config-parse").unwrap();
        std::fs::write(fixture.config_file(), default_config_yaml()).unwrap();

        let validated =
            crate::config::Config::load_and_validate(fixture.path()).expect("default is valid");
        assert_eq!(validated.server.port, DEFAULT_HTTP_PORT);
        assert_eq!(validated.logging.level, "info");
    }

    #[test]
    fn ensure_config_creates_once() {
        let fixture = TestFixtureRoot::new_unique("bootstrap-config-once").unwrap();

        assert!(ensure_config(fixture.path()).expect("first run creates"));
        assert!(!ensure_config(fixture.path()).expect("second run skips"));
    }
}
