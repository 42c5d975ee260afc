//! Configuration management for the schema tooling
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (datafix.toml)
//! - Environment variables (DATAFIX__*)
//!
//! ## Example config file (datafix.toml):
//! ```toml
//! [chain]
//! validate_references = true
//!
//! [output]
//! format = "pretty"
//!
//! [logging]
//! filter = "datafix_schemas=debug"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for the schema tooling
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Chain construction settings
    #[serde(default)]
    pub chain: ChainConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chain construction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Check every node's references while building the chain
    #[serde(default = "default_true")]
    pub validate_references: bool,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

impl OutputFormat {
    /// Render a JSON value in this format
    pub fn render(&self, value: &serde_json::Value) -> serde_json::Result<String> {
        match self {
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
            OutputFormat::Compact => serde_json::to_string(value),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber` filter used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_true() -> bool {
    true
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            validate_references: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl ToolConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["datafix.toml", ".datafix.toml", "config/datafix.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "datafix", "schemas") {
            let xdg_config = config_dir.config_dir().join("datafix.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // DATAFIX__CHAIN__VALIDATE_REFERENCES=false
        builder = builder.add_source(
            Environment::with_prefix("DATAFIX")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config() {
        let config = ToolConfig::default();
        assert!(config.chain.validate_references);
        assert_eq!(config.output.format, OutputFormat::Pretty);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_serialize_config() {
        let config = ToolConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[chain]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("format = \"pretty\""));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");

        let mut config = ToolConfig::default();
        config.chain.validate_references = false;
        config.output.format = OutputFormat::Compact;
        config.save(&path).unwrap();

        let loaded = ToolConfig::load_from(path.to_str()).unwrap();
        assert!(!loaded.chain.validate_references);
        assert_eq!(loaded.output.format, OutputFormat::Compact);
        assert_eq!(loaded.logging.filter, "info");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(ToolConfig::load_from(path.to_str()).is_err());
    }

    #[test]
    fn test_output_format_render() {
        let value = json!({"a": 1});
        assert_eq!(OutputFormat::Compact.render(&value).unwrap(), "{\"a\":1}");
        assert!(OutputFormat::Pretty.render(&value).unwrap().contains('\n'));
    }
}
