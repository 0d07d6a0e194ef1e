/**
* filename : config
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::ChartError;
use crate::indicators::OverlaySpec;
use crate::ingest::session::DEFAULT_PREVIEW_ROWS;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default = "default_indicators")]
    pub indicators: Vec<OverlaySpec>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub assume_milliseconds: bool,
    pub delimiter: char,
    pub preview_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_indicators() -> Vec<OverlaySpec> {
    vec![OverlaySpec::sma(20)]
}

impl Config {
    /// Load configuration from `config.json` in the working directory
    pub fn load() -> Result<Self, ChartError> {
        Config::load_from(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from a file; a missing file yields the defaults
    pub fn load_from(config_path: &Path) -> Result<Self, ChartError> {
        Config::load_with(config_path, |key| std::env::var(key).ok())
    }

    fn load_with(config_path: &Path, var: impl Fn(&str) -> Option<String>) -> Result<Self, ChartError> {
        let mut cfg = if config_path.exists() {
            let mut file = File::open(config_path)
                .map_err(|e| ChartError::ConfigError(format!("Failed to open config file: {}", e)))?;

            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .map_err(|e| ChartError::ConfigError(format!("Failed to read config file: {}", e)))?;

            Config::from_json(&contents)?
        } else {
            Config::default()
        };

        // environment overrides
        cfg.apply_overrides(var);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json(contents: &str) -> Result<Self, ChartError> {
        serde_json::from_str(contents)
            .map_err(|e| ChartError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// Apply `CHART_*` overrides for runtime fields
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("CHART_ASSUME_MS") {
            let lower = v.to_lowercase();
            if ["1", "true", "yes"].contains(&lower.as_str()) { self.ingest.assume_milliseconds = true; }
            if ["0", "false", "no"].contains(&lower.as_str()) { self.ingest.assume_milliseconds = false; }
        }
        if let Some(v) = var("CHART_DELIMITER") {
            let mut chars = v.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) { self.ingest.delimiter = c; }
        }
        if let Some(v) = var("CHART_LOG_LEVEL") { if !v.is_empty() { self.logging.level = v; } }
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        if !self.ingest.delimiter.is_ascii() {
            return Err(ChartError::ConfigError(format!(
                "delimiter must be a single-byte character: {:?}",
                self.ingest.delimiter
            )));
        }

        let mut names = HashSet::new();
        for spec in &self.indicators {
            spec.validate()
                .map_err(|e| ChartError::ConfigError(e.to_string()))?;
            if !names.insert(spec.name.as_str()) {
                return Err(ChartError::ConfigError(format!("Duplicate indicator name: {}", spec.name)));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ingest: IngestConfig::default(),
            indicators: default_indicators(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            assume_milliseconds: false,
            delimiter: ',',
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::IndicatorKind;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert!(!cfg.ingest.assume_milliseconds);
        assert_eq!(cfg.ingest.delimiter, ',');
        assert_eq!(cfg.indicators, vec![OverlaySpec::sma(20)]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg = Config::from_json(
            r#"{"indicators":[{"name":"fast","kind":"ema","period":9},{"name":"slow","kind":"ema","period":21}]}"#,
        )
        .unwrap();

        assert_eq!(cfg.ingest, IngestConfig::default());
        assert_eq!(cfg.indicators.len(), 2);
        assert_eq!(cfg.indicators[1].kind, IndicatorKind::Ema);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CHART_ASSUME_MS", "Yes"),
            ("CHART_DELIMITER", ";"),
            ("CHART_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let mut cfg = Config::default();
        cfg.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert!(cfg.ingest.assume_milliseconds);
        assert_eq!(cfg.ingest.delimiter, ';');
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn test_multi_char_delimiter_override_is_ignored() {
        let mut cfg = Config::default();
        cfg.apply_overrides(|k| (k == "CHART_DELIMITER").then(|| "||".to_string()));
        assert_eq!(cfg.ingest.delimiter, ',');
    }

    #[test]
    fn test_validation_errors() {
        let mut cfg = Config::default();
        cfg.indicators = vec![OverlaySpec::sma(0)];
        assert!(matches!(cfg.validate(), Err(ChartError::ConfigError(_))));

        cfg.indicators = vec![OverlaySpec::sma(5), OverlaySpec::new("SMA-5", IndicatorKind::Ema, 5)];
        assert!(matches!(cfg.validate(), Err(ChartError::ConfigError(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        // 실제 프로세스 환경 변수와 무관하게 검사
        let cfg = Config::load_with(Path::new("./does-not-exist/config.json"), |_| None).unwrap();
        assert_eq!(cfg.indicators, default_indicators());
        assert_eq!(cfg.ingest, IngestConfig::default());
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Config::from_json("{not json"), Err(ChartError::ConfigError(_))));
    }
}
