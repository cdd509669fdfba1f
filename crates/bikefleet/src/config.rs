//! Configuration management for bikefleet.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fleet::{RefNoPolicy, DEFAULT_TASK_TYPES};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "bikefleet";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "fleet.db";

/// Prefix of the environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "BIKEFLEET_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `BIKEFLEET_`, sections separated
///    by `__`, e.g. `BIKEFLEET_MAINTENANCE__OVERDUE_DAYS_THRESHOLD=10`)
/// 2. TOML config file at `~/.config/bikefleet/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Maintenance configuration.
    pub maintenance: MaintenanceConfig,
    /// Inventory configuration.
    pub inventory: InventoryConfig,
    /// Display configuration.
    pub display: DisplayConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/bikefleet/fleet.db`
    pub database_path: Option<PathBuf>,
    /// Load the demo fleet when the database holds no snapshot yet.
    pub seed_demo_data: bool,
}

/// Maintenance-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Days a record may stay pending before it is reported as overdue.
    pub overdue_days_threshold: u32,
    /// Task catalog for a fresh fleet.
    pub task_types: Vec<String>,
}

/// Inventory-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Regex every reference number must match. Unrestricted when unset.
    pub ref_no_pattern: Option<String>,
}

/// Display-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// `strftime` format used to print dates.
    pub date_format: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            seed_demo_data: true,
        }
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            overdue_days_threshold: 7,
            task_types: DEFAULT_TASK_TYPES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: "%d/%m/%Y".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `BIKEFLEET_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.maintenance.overdue_days_threshold == 0 {
            return Err(Error::ConfigValidation {
                message: "overdue_days_threshold must be greater than 0".to_string(),
            });
        }

        if self.maintenance.task_types.iter().any(|t| t.trim().is_empty()) {
            return Err(Error::ConfigValidation {
                message: "task_types must not contain blank entries".to_string(),
            });
        }

        if let Some(pattern) = &self.inventory.ref_no_pattern {
            if regex::Regex::new(pattern).is_err() {
                return Err(Error::ConfigValidation {
                    message: format!("invalid regex pattern: {pattern}"),
                });
            }
        }

        let format = &self.display.date_format;
        if format.is_empty() || StrftimeItems::new(format).any(|i| matches!(i, Item::Error)) {
            return Err(Error::ConfigValidation {
                message: format!("invalid date_format: {format:?}"),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the overdue threshold in days.
    #[must_use]
    pub fn overdue_threshold(&self) -> i64 {
        i64::from(self.maintenance.overdue_days_threshold)
    }

    /// Build the reference-number policy.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the pattern does not compile.
    pub fn ref_no_policy(&self) -> Result<RefNoPolicy> {
        RefNoPolicy::from_pattern(self.inventory.ref_no_pattern.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.seed_demo_data);
        assert!(config.storage.database_path.is_none());
        assert_eq!(config.maintenance.overdue_days_threshold, 7);
        assert_eq!(config.maintenance.task_types.len(), DEFAULT_TASK_TYPES.len());
        assert!(config.inventory.ref_no_pattern.is_none());
        assert_eq!(config.display.date_format, "%d/%m/%Y");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_threshold() {
        let mut config = Config::default();
        config.maintenance.overdue_days_threshold = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("overdue_days_threshold"));
    }

    #[test]
    fn test_validate_blank_task_type() {
        let mut config = Config::default();
        config.maintenance.task_types.push("   ".to_string());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("task_types"));
    }

    #[test]
    fn test_validate_invalid_regex() {
        let mut config = Config::default();
        config.inventory.ref_no_pattern = Some("[invalid".to_string());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("invalid regex"));
    }

    #[test]
    fn test_validate_date_format() {
        let mut config = Config::default();
        config.display.date_format = String::new();
        assert!(config.validate().is_err());

        config.display.date_format = "%Q".to_string();
        assert!(config.validate().is_err());

        config.display.date_format = "%Y-%m-%d".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        let path = config.database_path();

        assert!(path.to_string_lossy().contains("fleet.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_overdue_threshold() {
        let mut config = Config::default();
        assert_eq!(config.overdue_threshold(), 7);

        config.maintenance.overdue_days_threshold = 14;
        assert_eq!(config.overdue_threshold(), 14);
    }

    #[test]
    fn test_ref_no_policy() {
        let mut config = Config::default();
        assert!(config.ref_no_policy().unwrap().check("anything").is_ok());

        config.inventory.ref_no_pattern = Some(r"^[SMLX]+\d+$".to_string());
        let policy = config.ref_no_policy().unwrap();
        assert!(policy.check("M42").is_ok());
        assert!(policy.check("42").is_err());
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("bikefleet"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_default_data_dir() {
        let path = Config::default_data_dir();
        assert!(path.to_string_lossy().contains("bikefleet"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        figment::Jail::expect_with(|_| {
            let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
            assert_eq!(result.unwrap(), Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
[maintenance]
overdue_days_threshold = 10
task_types = ["True wheel"]

[inventory]
ref_no_pattern = "^[A-Z]+[0-9]+$"

[display]
date_format = "%Y-%m-%d"
"#,
            )?;

            let config = Config::load_from(Some(jail.directory().join("config.toml"))).unwrap();
            assert_eq!(config.maintenance.overdue_days_threshold, 10);
            assert_eq!(config.maintenance.task_types, ["True wheel"]);
            assert_eq!(
                config.inventory.ref_no_pattern.as_deref(),
                Some("^[A-Z]+[0-9]+$")
            );
            assert_eq!(config.display.date_format, "%Y-%m-%d");
            // Untouched sections keep their defaults.
            assert!(config.storage.seed_demo_data);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "[maintenance]\noverdue_days_threshold = 10\n\n[storage]\nseed_demo_data = true\n",
            )?;
            jail.set_env("BIKEFLEET_MAINTENANCE__OVERDUE_DAYS_THRESHOLD", "11");
            jail.set_env("BIKEFLEET_STORAGE__SEED_DEMO_DATA", "false");
            jail.set_env("BIKEFLEET_DISPLAY__DATE_FORMAT", "%Y/%m/%d");

            let config = Config::load_from(Some(jail.directory().join("config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.overdue_threshold(), 11);
            assert!(!config.storage.seed_demo_data);
            assert_eq!(config.display.date_format, "%Y/%m/%d");
            Ok(())
        });
    }

    #[test]
    fn test_env_values_are_validated() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("BIKEFLEET_MAINTENANCE__OVERDUE_DAYS_THRESHOLD", "0");

            let result = Config::load_from(Some(jail.directory().join("missing.toml")));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[maintenance]\noverdue_days_threshold = 0")?;

            let err = Config::load_from(Some(jail.directory().join("config.toml"))).unwrap_err();
            assert!(matches!(err, Error::ConfigValidation { .. }));
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("overdue_days_threshold"));
        assert!(json.contains("seed_demo_data"));
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"seed_demo_data": false}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert!(!storage.seed_demo_data);
        assert!(storage.database_path.is_none());
    }
}
