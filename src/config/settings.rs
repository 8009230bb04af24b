//! User settings for the household ledger
//!
//! Manages display and calculation preferences: currency symbol, the tax rate
//! given to newly approved members, the percentage split tolerance and the
//! default expense sort.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::engine::{SortKey, SPLIT_TOLERANCE};
use crate::error::LedgerError;
use crate::models::DEFAULT_TAX_RATE;

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used in terminal output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Tax rate assigned to newly approved members
    #[serde(default = "default_tax_rate")]
    pub default_tax_rate: f64,

    /// Allowed deviation of percentage shares from 1.0
    #[serde(default = "default_split_tolerance")]
    pub split_tolerance: f64,

    /// Default expense list ordering
    #[serde(default)]
    pub default_sort: SortKey,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_tax_rate() -> f64 {
    DEFAULT_TAX_RATE
}

fn default_split_tolerance() -> f64 {
    SPLIT_TOLERANCE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            default_tax_rate: default_tax_rate(),
            split_tolerance: default_split_tolerance(),
            default_sort: SortKey::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject settings the calculations cannot work with
    pub fn validate(&self) -> Result<(), LedgerError> {
        if !(0.0..1.0).contains(&self.default_tax_rate) {
            return Err(LedgerError::Config(format!(
                "default_tax_rate must be between 0 and 1 (got {})",
                self.default_tax_rate
            )));
        }

        if !(self.split_tolerance > 0.0 && self.split_tolerance < 0.5) {
            return Err(LedgerError::Config(format!(
                "split_tolerance must be between 0 and 0.5 (got {})",
                self.split_tolerance
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.default_tax_rate, 0.32);
        assert_eq!(settings.split_tolerance, 0.001);
        assert_eq!(settings.default_sort, SortKey::Name);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.currency_symbol = "€".into();
        settings.default_sort = SortKey::Amount;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "€");
        assert_eq!(loaded.default_sort, SortKey::Amount);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol":"£"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "£");
        assert_eq!(settings.default_tax_rate, 0.32);
        assert_eq!(settings.schema_version, 1);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"split_tolerance": 2.0}"#).unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }
}
