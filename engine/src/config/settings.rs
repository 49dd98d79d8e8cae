// Engine settings, loaded from an optional JSON file with environment overrides
use crate::data::CsvFormat;
use crate::error::{EngineError, Result};
use crate::models::{CostModel, RiskProfile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "GRID_ADVISOR_DATA_DIR";

/// Values used when the caller does not supply them.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CalculationDefaults {
    pub commission_rate: f64,
    pub fixed_fee: f64,
    pub trade_volume: f64,
    pub risk_level: RiskProfile,
    /// One month, three months and six months.
    pub horizons: Vec<u32>,
}

impl Default for CalculationDefaults {
    fn default() -> Self {
        CalculationDefaults {
            commission_rate: 0.001,
            fixed_fee: 1.0,
            trade_volume: 100.0,
            risk_level: RiskProfile::Medium,
            horizons: vec![30, 90, 180],
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Directory holding one `<SYMBOL>.csv` export per instrument.
    pub data_dir: PathBuf,
    pub csv_format: CsvFormat,
    /// Calendar days of history fed to the statistics.
    pub lookback_days: u32,
    /// Horizons are optimized on this many blocking workers; 1 keeps everything on the caller's task.
    pub worker_threads: usize,
    pub defaults: CalculationDefaults,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            data_dir: PathBuf::from("data"),
            csv_format: CsvFormat::Standard,
            lookback_days: 252,
            worker_threads: 4,
            defaults: CalculationDefaults::default(),
        }
    }
}

impl EngineSettings {
    /// Reads settings from `path` (defaults when `None`), then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        settings.apply_env_overrides(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("Cannot read config file '{}': {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| EngineError::ConfigError(format!("Invalid config: {}", e)))
    }

    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            tracing::debug!(data_dir = %dir, "Data directory overridden from environment");
            self.data_dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(EngineError::ConfigError("worker_threads must be at least 1".to_string()));
        }
        if self.lookback_days == 0 {
            return Err(EngineError::ConfigError("lookback_days must be positive".to_string()));
        }
        if self.defaults.horizons.is_empty() || self.defaults.horizons.contains(&0) {
            return Err(EngineError::ConfigError(
                "default horizons must be a non-empty list of positive day counts".to_string(),
            ));
        }
        self.default_cost_model()
            .map_err(|e| EngineError::ConfigError(format!("Invalid default costs: {}", e)))?;
        Ok(())
    }

    pub fn default_cost_model(&self) -> Result<CostModel> {
        CostModel::new(
            self.defaults.commission_rate,
            self.defaults.fixed_fee,
            self.defaults.trade_volume,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let settings = EngineSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.defaults.horizons, vec![30, 90, 180]);
        assert_eq!(settings.lookback_days, 252);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = EngineSettings::from_json(
            r#"{ "csv_format": "brazilian", "defaults": { "risk_level": "high", "horizons": [7, 365] } }"#,
        )
        .unwrap();
        assert_eq!(settings.csv_format, CsvFormat::Brazilian);
        assert_eq!(settings.defaults.risk_level, RiskProfile::High);
        assert_eq!(settings.defaults.horizons, vec![7, 365]);
        assert_eq!(settings.defaults.trade_volume, 100.0);
        assert_eq!(settings.worker_threads, 4);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "data_dir": "/tmp/prices", "lookback_days": 500 }}"#).unwrap();
        let settings = EngineSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/prices"));
        assert_eq!(settings.lookback_days, 500);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        assert!(matches!(EngineSettings::from_json("{ not json"), Err(EngineError::ConfigError(_))));
        assert!(matches!(
            EngineSettings::from_json(r#"{ "defaults": { "risk_level": "extreme" } }"#),
            Err(EngineError::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = EngineSettings::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(_)));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut settings = EngineSettings::default();
        settings.worker_threads = 0;
        assert!(settings.validate().is_err());

        let mut settings = EngineSettings::default();
        settings.defaults.horizons = vec![30, 0];
        assert!(settings.validate().is_err());

        let mut settings = EngineSettings::default();
        settings.defaults.trade_volume = 0.0;
        assert!(matches!(settings.validate(), Err(EngineError::ConfigError(_))));
    }

    #[test]
    fn test_env_override() {
        let mut settings = EngineSettings::default();
        settings.apply_env_overrides(|key| (key == DATA_DIR_ENV).then(|| "/srv/history".to_string()));
        assert_eq!(settings.data_dir, PathBuf::from("/srv/history"));

        let mut untouched = EngineSettings::default();
        untouched.apply_env_overrides(|_| None);
        assert_eq!(untouched.data_dir, PathBuf::from("data"));
    }
}
