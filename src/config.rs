//! Runtime configuration.
//!
//! Values come from three layers, later ones winning:
//! 1. Built-in defaults (TianAPI endpoint, 10 topics, 10 s timeout)
//! 2. An optional YAML file passed with `--config`
//! 3. Command-line flags and environment variables (see [`crate::cli::Cli`])
//!
//! # Example file
//!
//! ```yaml
//! api_key: your-tianapi-key
//! default_count: 20
//! output_dir: ./reports
//! ```

use crate::error::ConfigError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

/// Topic counts selectable from the interactive console.
pub const ALLOWED_COUNTS: [usize; 4] = [5, 10, 20, 30];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Hot-search endpoint, without the key.
    pub endpoint: String,
    /// API key sent as the `key` query parameter.
    pub api_key: String,
    pub user_agent: String,
    /// Connect and read timeout for the API call.
    pub timeout_secs: u64,
    /// How many topics to analyze when no count is given.
    pub default_count: usize,
    /// Report filename prefix; the date and `.html` are appended.
    pub output_prefix: String,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://apis.tianapi.com/weibohot/index".to_string(),
            api_key: String::new(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
            timeout_secs: 10,
            default_count: 10,
            output_prefix: "weibo_product_ideas".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Load a YAML config file; keys missing from the file keep their defaults.
    #[instrument(level = "info")]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let shown = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: shown.clone(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: shown.clone(),
            source,
        })?;
        info!(path = %shown, "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Report location for a given day: `<output_dir>/<prefix>_<YYMMDD>.html`.
    pub fn report_path(&self, date: NaiveDate) -> PathBuf {
        crate::outputs::report::report_path(&self.output_dir, &self.output_prefix, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = AppConfig::default();
        assert_eq!(c.default_count, 10);
        assert_eq!(c.timeout(), Duration::from_secs(10));
        assert_eq!(c.output_prefix, "weibo_product_ideas");
        assert!(c.endpoint.starts_with("https://apis.tianapi.com/"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let c = AppConfig::from_yaml("api_key: abc\ndefault_count: 20\n").unwrap();
        assert_eq!(c.api_key, "abc");
        assert_eq!(c.default_count, 20);
        assert_eq!(c.timeout_secs, 10);
        assert_eq!(c.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(AppConfig::from_yaml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_malformed_yaml_is_rejected() {
        assert!(AppConfig::from_yaml("timeout_secs: [oops").is_err());
    }

    #[test]
    fn test_load_reads_yaml_file() {
        let path = std::env::temp_dir().join(format!(
            "weibo_trend_ideas_config_{}.yaml",
            std::process::id()
        ));
        std::fs::write(&path, "default_count: 30\noutput_prefix: ideas\n").unwrap();

        let c = AppConfig::load(&path).unwrap();
        assert_eq!(c.default_count, 30);
        assert_eq!(c.output_prefix, "ideas");
        assert_eq!(c.timeout_secs, 10);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = AppConfig::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_report_path_uses_prefix_and_date() {
        let c = AppConfig {
            output_dir: PathBuf::from("out"),
            ..AppConfig::default()
        };
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(
            c.report_path(date),
            PathBuf::from("out/weibo_product_ideas_260105.html")
        );
    }
}
