//! TOML-based settings for the server binary.
//!
//! The settings file is optional: a missing file yields
//! [`ServerSettings::default()`], so the server works on first run. Fields
//! absent from the file fall back to their serde defaults, which keeps old
//! settings files working when new fields are added.
//!
//! ```toml
//! [server]
//! address = "0.0.0.0:50051"
//! log_level = "info"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level settings for the server binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ServerSettings {
    #[serde(default)]
    pub server: ServerSection,
}

/// The `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// Address to listen on.
    #[serde(default = "default_address")]
    pub address: String,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_address() -> String {
    "0.0.0.0:50051".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            address: default_address(),
            log_level: default_log_level(),
        }
    }
}

impl ServerSettings {
    /// Loads settings from `path`, returning defaults if the file does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] for file-system errors other than
    /// "not found", and [`SettingsError::Parse`] if the TOML is malformed.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(SettingsError::Io {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_have_expected_address_and_level() {
        let settings = ServerSettings::default();
        assert_eq!(settings.server.address, "0.0.0.0:50051");
        assert_eq!(settings.server.log_level, "info");
    }

    #[test]
    fn test_load_returns_defaults_when_file_absent() {
        let path = Path::new("/nonexistent/path/that/cannot/exist/veil-server.toml");

        let settings = ServerSettings::load(path).expect("missing file is not an error");

        assert_eq!(settings, ServerSettings::default());
    }

    #[test]
    fn test_deserialize_minimal_toml_uses_defaults() {
        let settings: ServerSettings = toml::from_str("[server]\n").expect("deserialize");
        assert_eq!(settings.server.address, "0.0.0.0:50051");
    }

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let settings: ServerSettings = toml::from_str("").expect("deserialize");
        assert_eq!(settings, ServerSettings::default());
    }

    #[test]
    fn test_deserialize_partial_section_overrides_defaults() {
        let settings: ServerSettings =
            toml::from_str("[server]\naddress = \"127.0.0.1:9000\"\n").expect("deserialize");
        assert_eq!(settings.server.address, "127.0.0.1:9000");
        // Unspecified fields keep their defaults
        assert_eq!(settings.server.log_level, "info");
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        let result: Result<ServerSettings, toml::de::Error> = toml::from_str("[[[ not valid toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_round_trip_via_temp_file() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("veil_settings_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("veil-server.toml");

        let mut settings = ServerSettings::default();
        settings.server.address = "127.0.0.1:12345".to_string();
        settings.server.log_level = "debug".to_string();

        // Act
        std::fs::write(&path, toml::to_string_pretty(&settings).unwrap()).unwrap();
        let loaded = ServerSettings::load(&path).expect("load");

        // Assert
        assert_eq!(loaded, settings);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }
}
