// This file is part of the product Notewell.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub app: AppConfig,
}

/// Configuration that passed startup validation. The server refuses to run
/// without one of these.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub app: AppConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl ServerConfig {
    pub fn address_tuple(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

fn default_workers() -> usize {
    4
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_app_description")]
    pub description: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            description: default_app_description(),
        }
    }
}

fn default_app_name() -> String {
    "Notewell".to_string()
}

fn default_app_description() -> String {
    "A lightweight personal notes service".to_string()
}

impl Config {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join("config.yaml");
        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        let config: Config = serde_yaml::from_str(&config_content).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to parse config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Loads and validates configuration at startup. If validation fails, the application should not start.
    pub fn load_and_validate(root: &Path) -> Result<ValidatedConfig, ConfigError> {
        let config = Self::load(root)?;
        Self::validate_server(&config.server)?;

        Ok(ValidatedConfig {
            server: config.server,
            logging: config.logging,
            app: config.app,
        })
    }

    fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
        if server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host cannot be empty".to_string(),
            ));
        }
        if server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be greater than 0".to_string(),
            ));
        }
        if server.workers == 0 {
            return Err(ConfigError::ValidationError(
                "server.workers must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_fixtures::TestFixtureRoot;
    use std::fs;

    fn base_server_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: 1,
        }
    }

    #[test]
    fn validate_server_accepts_base_config() {
        let server = base_server_config();
        assert!(Config::validate_server(&server).is_ok());
    }

    #[test]
    fn validate_server_rejects_empty_host() {
        let server = ServerConfig {
            host: "   ".to_string(),
            ..base_server_config()
        };
        let err = Config::validate_server(&server).unwrap_err();
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn validate_server_rejects_zero_port() {
        let server = ServerConfig {
            port: 0,
            ..base_server_config()
        };
        let err = Config::validate_server(&server).unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn validate_server_rejects_zero_workers() {
        let server = ServerConfig {
            workers: 0,
            ..base_server_config()
        };
        let err = Config::validate_server(&server).unwrap_err();
        assert!(err.to_string().contains("server.workers"));
    }

    #[test]
    fn load_reports_missing_config_file() {
        let fixture = TestFixtureRoot::new_unique("config-missing").expect("fixture root");
        let err = Config::load(fixture.path()).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }

    #[test]
    fn load_and_validate_accepts_minimal_config() {
        let fixture = TestFixtureRoot::new_unique("config-minimal").expect("fixture root");
        fs::write(
            fixture.path().join("config.yaml"),
            "server:\n  host: \"127.0.0.1\"\n  port: 7090\n",
        )
        .expect("write config");

        let validated = Config::load_and_validate(fixture.path()).expect("valid config");
        assert_eq!(validated.server.workers, 4);
        assert_eq!(validated.logging.level, "info");
        assert_eq!(validated.app.name, "Notewell");
    }

    #[test]
    fn load_and_validate_keeps_explicit_sections() {
        let fixture = TestFixtureRoot::new_unique("config-full").expect("fixture root");
        fs::write(
            fixture.path().join("config.yaml"),
            "server:\n  host: \"0.0.0.0\"\n  port: 9000\n  workers: 2\n\nlogging:\n  level: \"debug\"\n\napp:\n  name: \"My Notes\"\n  description: \"desc\"\n",
        )
        .expect("write config");

        let validated = Config::load_and_validate(fixture.path()).expect("valid config");
        assert_eq!(validated.server.address_tuple(), ("0.0.0.0", 9000));
        assert_eq!(validated.server.workers, 2);
        assert_eq!(validated.logging.level, "debug");
        assert_eq!(validated.app.name, "My Notes");
    }

    #[test]
    fn load_rejects_malformed_yaml() {
        let fixture = TestFixtureRoot::new_unique("config-malformed").expect("fixture root");
        fs::write(fixture.path().join("config.yaml"), "server: [not a mapping")
            .expect("write config");
        let err = Config::load(fixture.path()).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}
