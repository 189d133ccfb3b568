//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use chronicle_enricher::EnricherConfig;
use chronicle_llm::LlmConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Archive name used in citations
    #[serde(default = "default_archive_name")]
    pub archive_name: String,

    /// Uploader recorded when `--uploader` is not given
    #[serde(default = "default_uploader")]
    pub uploader: String,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Text generation endpoint
    #[serde(default)]
    pub llm: LlmConfig,

    /// Enrichment pipeline
    #[serde(default)]
    pub enricher: EnricherConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Items per page for `list`
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding the config file and default database.
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".chronicle"))
    }

    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check values that would only fail later, deep inside a command.
    pub fn validate(&self) -> Result<()> {
        if self.settings.page_size == 0 {
            return Err(CliError::Config("settings.page_size must be greater than 0".into()));
        }
        if self.archive_name.trim().is_empty() {
            return Err(CliError::Config("archive_name must not be empty".into()));
        }
        self.enricher.validate()?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            archive_name: default_archive_name(),
            uploader: default_uploader(),
            settings: Settings::default(),
            llm: LlmConfig::default(),
            enricher: EnricherConfig::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            page_size: default_page_size(),
        }
    }
}

fn default_database() -> PathBuf {
    Config::dir()
        .map(|dir| dir.join("archive.db"))
        .unwrap_or_else(|_| PathBuf::from("chronicle.db"))
}

fn default_archive_name() -> String {
    "Chronicle Archive".to_string()
}

fn default_uploader() -> String {
    "anonymous".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_page_size() -> usize {
    20
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.archive_name, "Chronicle Archive");
        assert!(config.settings.color);
        assert_eq!(config.settings.page_size, 20);
        assert_eq!(config.enricher.max_tags, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.uploader, "anonymous");
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "archive_name = \"Harbour Society\"\n\n[settings]\nformat = \"json\"\n\n[llm]\nmodel = \"mistral\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.archive_name, "Harbour Society");
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.settings.color);
        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.enricher.target_language, "en");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.database = dir.path().join("archive.db");
        config.settings.page_size = 50;
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.database, config.database);
        assert_eq!(reloaded.settings.page_size, 50);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.settings.page_size = 0;
        assert!(matches!(config.validate(), Err(CliError::Config(_))));

        let mut config = Config::default();
        config.enricher.max_content_chars = 0;
        assert!(config.validate().is_err());
    }
}
