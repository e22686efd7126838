//! Directory settings
//!
//! Loaded from an optional TOML file overlaid by `KEYWARD_*` environment
//! variables. Anything missing falls back to [`DirectorySettings::default`].

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use keyward_common::LogLevel;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Default environment variable prefix
pub const DEFAULT_ENV_PREFIX: &str = "KEYWARD";

/// Policy knobs for the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorySettings {
    /// Role names that can never be deleted, compared case-insensitively
    pub protected_role_names: Vec<String>,
    /// Holders of a role with exactly this name cannot be deleted
    pub admin_role_name: String,
    /// How many activities the feed retains
    pub activity_capacity: usize,
    pub log_level: String,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            protected_role_names: vec!["super admin".to_string()],
            admin_role_name: "admin".to_string(),
            activity_capacity: 10,
            log_level: LogLevel::default().to_string(),
        }
    }
}

impl DirectorySettings {
    pub fn is_protected_role(&self, role_name: &str) -> bool {
        self.protected_role_names
            .iter()
            .any(|protected| protected.eq_ignore_ascii_case(role_name))
    }

    /// Parsed log level, falling back to the default on unknown names
    pub fn log_level(&self) -> LogLevel {
        self.log_level.parse().unwrap_or_default()
    }
}

/// Loads and saves [`DirectorySettings`]
#[derive(Debug, Clone)]
pub struct SettingsManager {
    path: Option<PathBuf>,
    env_prefix: String,
}

impl SettingsManager {
    /// Environment only, no settings file
    pub fn new() -> Self {
        Self {
            path: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load(&self) -> Result<DirectorySettings, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = &self.path {
            builder = builder.add_source(File::from(path.clone()).required(false));
        }
        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("protected_role_names"),
        );

        let settings: DirectorySettings = builder.build()?.try_deserialize()?;
        validate_settings(&settings)?;

        debug!(
            path = ?self.path,
            capacity = settings.activity_capacity,
            "Loaded directory settings"
        );
        Ok(settings)
    }

    pub fn save(&self, settings: &DirectorySettings) -> Result<(), ConfigError> {
        let Some(path) = &self.path else {
            return Err(ConfigError::Validation(
                "No settings file configured".to_string(),
            ));
        };

        validate_settings(settings)?;
        let toml = toml::to_string(settings)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml)?;
        Ok(())
    }
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_settings(settings: &DirectorySettings) -> Result<(), ConfigError> {
    if settings.activity_capacity == 0 {
        return Err(ConfigError::Validation(
            "Activity capacity must be greater than 0".to_string(),
        ));
    }
    if settings.admin_role_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "Admin role name must not be empty".to_string(),
        ));
    }
    if settings.log_level.parse::<LogLevel>().is_err() {
        return Err(ConfigError::Validation(format!(
            "Unknown log level: {}",
            settings.log_level
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = DirectorySettings::default();
        assert!(settings.is_protected_role("Super Admin"));
        assert!(settings.is_protected_role("SUPER ADMIN"));
        assert!(!settings.is_protected_role("User Manager"));
        assert_eq!(settings.admin_role_name, "admin");
        assert_eq!(settings.activity_capacity, 10);
        assert_eq!(settings.log_level(), LogLevel::Info);
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let settings = DirectorySettings {
            activity_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let settings = DirectorySettings {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = SettingsManager::with_path(dir.path().join("absent.toml"))
            .with_env_prefix("KEYWARD_TEST_MISSING");
        assert_eq!(manager.load().unwrap(), DirectorySettings::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let manager = SettingsManager::with_path(dir.path().join("nested").join("keyward.toml"))
            .with_env_prefix("KEYWARD_TEST_ROUND_TRIP");
        let settings = DirectorySettings {
            protected_role_names: vec!["super admin".into(), "auditor".into()],
            admin_role_name: "root".into(),
            activity_capacity: 25,
            log_level: "debug".into(),
        };

        manager.save(&settings).unwrap();
        assert_eq!(manager.load().unwrap(), settings);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keyward.toml");
        std::fs::write(&path, "activity_capacity = 3\n").unwrap();

        let settings = SettingsManager::with_path(&path)
            .with_env_prefix("KEYWARD_TEST_PARTIAL")
            .load()
            .unwrap();
        assert_eq!(settings.activity_capacity, 3);
        assert_eq!(settings.admin_role_name, "admin");
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keyward.toml");
        std::fs::write(&path, "activity_capacity = 3\nadmin_role_name = \"admin\"\n").unwrap();
        std::env::set_var("KEYWARD_TEST_ENV_ADMIN_ROLE_NAME", "owner");

        let settings = SettingsManager::with_path(&path)
            .with_env_prefix("KEYWARD_TEST_ENV")
            .load()
            .unwrap();
        std::env::remove_var("KEYWARD_TEST_ENV_ADMIN_ROLE_NAME");

        assert_eq!(settings.admin_role_name, "owner");
        assert_eq!(settings.activity_capacity, 3);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keyward.toml");
        std::fs::write(&path, "activity_capacity = 0\n").unwrap();

        let result = SettingsManager::with_path(&path)
            .with_env_prefix("KEYWARD_TEST_INVALID")
            .load();
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_save_without_path_fails() {
        assert!(SettingsManager::new()
            .save(&DirectorySettings::default())
            .is_err());
    }
}
