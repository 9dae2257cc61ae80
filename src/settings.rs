//! # Settings Module
//!
//! ## Purpose
//! Keeps the user configuration of StoichKit: logging level, number of decimal places
//! in printed tables and custom atomic masses which override the built-in periodic table.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "log_level": "info",
//!   "decimal_places": 4,
//!   "atomic_mass_overrides": { "H": 1.00794 }
//! }
//! ```
//!
//! ## Usage Pattern
//! ```rust
//! use StoichKit::settings::Settings;
//!
//! let settings = Settings::new();
//! let table = settings.periodic_table();
//! ```

use crate::Stoichiometry::molmass::PeriodicTable;
use log::{LevelFilter, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "stoichkit_config.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid atomic mass {mass} for element '{element}'")]
    InvalidAtomicMass { element: String, mass: f64 },
}

/// Serializable configuration stored in stoichkit_config.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// off, error, warn, info, debug, trace
    pub log_level: String,
    /// decimal places of masses and moles in tables
    pub decimal_places: usize,
    /// element symbol -> atomic mass, g/mol
    pub atomic_mass_overrides: HashMap<String, f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            decimal_places: 4,
            atomic_mass_overrides: HashMap::new(),
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (element, &mass) in &self.atomic_mass_overrides {
            if !mass.is_finite() || mass <= 0.0 {
                return Err(SettingsError::InvalidAtomicMass {
                    element: element.clone(),
                    mass,
                });
            }
        }
        Ok(())
    }

    /// unknown names fall back to Info
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

/// Configuration together with the file it is persisted to.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: SolverConfig,
    config_file: String,
}

impl Settings {
    /// Loads stoichkit_config.json from the working directory; if the file is missing or
    /// broken the default configuration is used.
    pub fn new() -> Self {
        Self::with_config_file(DEFAULT_CONFIG_FILE)
    }

    pub fn with_config_file(config_file: &str) -> Self {
        let config = match Self::load_config(config_file) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}, default settings are used", e);
                SolverConfig::default()
            }
        };
        Self {
            config,
            config_file: config_file.to_string(),
        }
    }

    /// Reads and validates the config. Missing file is not an error: defaults are returned
    pub fn load_config(config_file: &str) -> Result<SolverConfig, SettingsError> {
        if !Path::new(config_file).exists() {
            return Ok(SolverConfig::default());
        }
        let content = fs::read_to_string(config_file)?;
        let config: SolverConfig = serde_json::from_str(&content)?;
        config.validate()?;
        info!("settings loaded from '{}'", config_file);
        Ok(config)
    }

    pub fn save_config(&self) -> Result<(), SettingsError> {
        self.config.validate()?;
        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.config_file, content)?;
        info!("settings saved to '{}'", self.config_file);
        Ok(())
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    pub fn set_atomic_mass(&mut self, element: &str, mass: f64) -> Result<(), SettingsError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(SettingsError::InvalidAtomicMass {
                element: element.to_string(),
                mass,
            });
        }
        self.config
            .atomic_mass_overrides
            .insert(element.to_string(), mass);
        Ok(())
    }

    /// molar mass lookup with the user overrides applied
    pub fn periodic_table(&self) -> PeriodicTable {
        PeriodicTable::with_overrides(self.config.atomic_mass_overrides.clone())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Stoichiometry::molmass::MolarMassLookup;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let settings = Settings::with_config_file(path.to_str().unwrap());
        assert_eq!(settings.config, SolverConfig::default());
        assert_eq!(settings.config.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "decimal_places": 2, "atomic_mass_overrides": {{ "H": 1.0 }} }}"#).unwrap();
        let config = Settings::load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.decimal_places, 2);
        assert_eq!(config.log_level, "info");

        let settings = Settings::with_config_file(file.path().to_str().unwrap());
        let table = settings.periodic_table();
        assert_relative_eq!(table.molar_mass("H2").unwrap(), 2.0);
    }

    #[test]
    fn test_invalid_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "atomic_mass_overrides": {{ "H": -1.0 }} }}"#).unwrap();
        assert!(matches!(
            Settings::load_config(file.path().to_str().unwrap()),
            Err(SettingsError::InvalidAtomicMass { .. })
        ));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            Settings::load_config(file.path().to_str().unwrap()),
            Err(SettingsError::Json(_))
        ));
        // broken file does not stop the program
        let settings = Settings::with_config_file(file.path().to_str().unwrap());
        assert_eq!(settings.config, SolverConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let path = path.to_str().unwrap();
        let mut settings = Settings::with_config_file(path);
        settings.config.log_level = "debug".to_string();
        settings.set_atomic_mass("Xx", 100.0).unwrap();
        assert!(settings.set_atomic_mass("Yy", f64::NAN).is_err());
        settings.save_config().unwrap();

        let reloaded = Settings::with_config_file(path);
        assert_eq!(reloaded.config, settings.config);
        assert_eq!(reloaded.config.level_filter(), LevelFilter::Debug);
        assert_eq!(reloaded.config_file(), path);
    }
}
