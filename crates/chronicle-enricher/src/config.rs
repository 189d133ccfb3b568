//! Configuration for the Enricher

use crate::error::EnricherError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Enricher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnricherConfig {
    /// Characters of content sent to the model
    pub max_content_chars: usize,

    /// Tags kept from the model's answer
    pub max_tags: usize,

    /// Tags must be shorter than this many characters
    pub max_tag_length: usize,

    /// Maximum time for a single provider call (seconds)
    pub call_timeout_secs: u64,

    /// Translate non-English content
    pub translate: bool,

    /// Language translations are produced in
    pub target_language: String,
}

impl EnricherConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), EnricherError> {
        if self.max_content_chars == 0 {
            return Err(EnricherError::Config(
                "max_content_chars must be greater than 0".to_string(),
            ));
        }
        if self.max_tags == 0 {
            return Err(EnricherError::Config("max_tags must be greater than 0".to_string()));
        }
        if self.max_tag_length < 2 {
            return Err(EnricherError::Config(
                "max_tag_length must be at least 2".to_string(),
            ));
        }
        if self.call_timeout_secs == 0 {
            return Err(EnricherError::Config(
                "call_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.target_language.trim().is_empty() {
            return Err(EnricherError::Config("target_language must be set".to_string()));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, EnricherError> {
        toml::from_str(toml_str)
            .map_err(|e| EnricherError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, EnricherError> {
        toml::to_string_pretty(self)
            .map_err(|e| EnricherError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            max_content_chars: 5_000,
            max_tags: 5,
            max_tag_length: 30,
            call_timeout_secs: 60,
            translate: true,
            target_language: "en".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EnricherConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let config = EnricherConfig {
            max_tags: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EnricherConfig {
            call_timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EnricherError::Config(_))));

        let config = EnricherConfig {
            target_language: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EnricherConfig::from_toml("max_tags = 3\ntranslate = false").unwrap();
        assert_eq!(config.max_tags, 3);
        assert!(!config.translate);
        assert_eq!(config.max_content_chars, 5_000);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EnricherConfig {
            call_timeout_secs: 15,
            ..Default::default()
        };
        let parsed = EnricherConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_bad_toml() {
        assert!(EnricherConfig::from_toml("max_tags = \"many\"").is_err());
    }
}
