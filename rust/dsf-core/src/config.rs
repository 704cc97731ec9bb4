//! Featurizer configuration.
//!
//! Loaded from YAML. Every field has a default so an empty document is a valid config.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Unknown output kind: {0:?} (expected \"dense\" or \"sparse\")")]
    UnknownOutputKind(String),
}

/// Materialization format of an encoded state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Fixed-width numeric vector.
    #[default]
    Dense,
    /// One-row compressed sparse row matrix.
    Sparse,
}

impl OutputKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputKind::Dense => "dense",
            OutputKind::Sparse => "sparse",
        }
    }

    /// Parse an output kind, falling back to [`OutputKind::Dense`] for anything unrecognized.
    ///
    /// Use [`str::parse`] instead when an unknown value should be rejected.
    pub fn parse_lenient(s: &str) -> OutputKind {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for OutputKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dense" => Ok(OutputKind::Dense),
            "sparse" => Ok(OutputKind::Sparse),
            _ => Err(ConfigError::UnknownOutputKind(s.to_string())),
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub featurizer: FeaturizerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which encoder to build and how to materialize its output.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeaturizerConfig {
    /// Registry name of the state encoder (e.g. "binary", "label_tokenizer", "bag_of_words").
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default)]
    pub output: OutputKind,
    /// Window length for tracker featurization. `None` featurizes the full dialogue.
    #[serde(default)]
    pub max_history: Option<usize>,
}

fn default_strategy() -> String {
    "binary".to_string()
}

impl Default for FeaturizerConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            output: OutputKind::default(),
            max_history: None,
        }
    }
}

/// NDJSON event logging settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Flush the event log every N lines (0 disables periodic flushing).
    #[serde(default = "default_flush_every_lines")]
    pub flush_every_lines: u64,
}

fn default_flush_every_lines() -> u64 {
    100
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            flush_every_lines: default_flush_every_lines(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}

pub fn validate_config(cfg: &Config) -> Result<(), String> {
    if cfg.featurizer.strategy.trim().is_empty() {
        return Err("featurizer.strategy must be non-empty".to_string());
    }
    if let Some(n) = cfg.featurizer.max_history {
        if n < 1 {
            return Err("featurizer.max_history must be >= 1 when set".to_string());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_string() {
        let yaml = r#"
featurizer:
  strategy: bag_of_words
  output: sparse
  max_history: 5

logging:
  flush_every_lines: 10
"#;
        let config = Config::from_yaml(yaml).expect("Failed to parse YAML");
        assert_eq!(config.featurizer.strategy, "bag_of_words");
        assert_eq!(config.featurizer.output, OutputKind::Sparse);
        assert_eq!(config.featurizer.max_history, Some(5));
        assert_eq!(config.logging.flush_every_lines, 10);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_defaults_apply_to_empty_document() {
        let config = Config::from_yaml("{}").expect("empty mapping parses");
        assert_eq!(config, Config::default());
        assert_eq!(config.featurizer.strategy, "binary");
        assert_eq!(config.featurizer.output, OutputKind::Dense);
        assert_eq!(config.logging.flush_every_lines, 100);
    }

    #[test]
    fn test_unknown_output_kind_is_rejected_by_config() {
        let yaml = "featurizer:\n  output: columnar\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_invalid_yaml_fails() {
        let invalid_yaml = "this is not: valid: yaml: {{{}}}";
        assert!(Config::from_yaml(invalid_yaml).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_history() {
        let mut config = Config::default();
        config.featurizer.max_history = Some(0);
        assert!(validate_config(&config).is_err());
        config.featurizer.max_history = Some(1);
        config.featurizer.strategy = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn output_kind_strict_and_lenient_parsing() {
        assert_eq!("dense".parse::<OutputKind>().unwrap(), OutputKind::Dense);
        assert_eq!(" Sparse ".parse::<OutputKind>().unwrap(), OutputKind::Sparse);
        assert!(matches!(
            "csr".parse::<OutputKind>(),
            Err(ConfigError::UnknownOutputKind(s)) if s == "csr"
        ));
        assert_eq!(OutputKind::parse_lenient("csr"), OutputKind::Dense);
        assert_eq!(OutputKind::parse_lenient("sparse"), OutputKind::Sparse);
        assert_eq!(OutputKind::Sparse.to_string(), "sparse");
    }
}
