use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LogConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// Where inputs are read from and outputs written to
    pub output: OutputSettings,

    /// Marketplace description settings
    pub marketplace: MarketplaceSettings,

    /// Validation thresholds
    pub validation: ValidationSettings,

    /// Logging settings
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input and output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Root under which race folders are created
    pub root_dir: PathBuf,

    /// Directory holding `<variant folder>/template.json` plan templates
    pub plans_dir: PathBuf,

    /// `<author>` written into every ZWO file
    pub author: String,

    /// Write a JSON run report into the race folder
    pub write_report: bool,

    /// Replace files that already exist; when false they are skipped
    pub overwrite: bool,
}

/// Marketplace generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplaceSettings {
    /// Text-only character limit before a warning is logged
    pub char_limit: usize,

    /// Fixed seed for copy selection; derived per variant when unset
    pub copy_seed: Option<u64>,

    /// Rephrase non-negotiables through the keyword templates instead of
    /// quoting the race data verbatim
    pub rephrase_non_negotiables: bool,
}

/// Validation thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Maximum marketplace length, in characters
    pub max_marketplace_chars: usize,

    /// Race name must appear at least this many times
    pub min_race_mentions: usize,

    /// Race name appearing more often than this is a warning
    pub max_race_mentions: usize,

    /// Masters keyword hits in a non-masters file that count as a leak
    pub masters_leak_threshold: usize,

    /// Characters skipped before checking for tier keywords
    pub header_skip_chars: usize,

    /// Coach-speak phrases that fail a marketplace description
    pub forbidden_phrases: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            output: OutputSettings::default(),
            marketplace: MarketplaceSettings::default(),
            validation: ValidationSettings::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Default for ConfigMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            version: "1.0".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("races"),
            plans_dir: PathBuf::from("plans"),
            author: "Gravel God Training".to_string(),
            write_report: true,
            overwrite: true,
        }
    }
}

impl Default for MarketplaceSettings {
    fn default() -> Self {
        Self {
            char_limit: 4000,
            copy_seed: None,
            rephrase_non_negotiables: false,
        }
    }
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            max_marketplace_chars: 4000,
            min_race_mentions: 2,
            max_race_mentions: 4,
            masters_leak_threshold: 3,
            header_skip_chars: 500,
            forbidden_phrases: [
                "unlock your potential",
                "train smarter not harder",
                "take your training to the next level",
                "are you ready to",
                "transform your",
                "achieve your dreams",
                "reach your goals",
                "become the athlete you",
                "unleash your",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gravelkit")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(_) => {
                tracing::debug!(
                    "Config file not found, using defaults: {}",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Load from an explicit path when given, else the default location
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::load_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.metadata.version, deserialized.metadata.version);
        assert_eq!(deserialized.marketplace.char_limit, 4000);
        assert_eq!(deserialized.output.author, "Gravel God Training");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [marketplace]
            copy_seed = 42
            "#,
        )
        .unwrap();

        assert_eq!(config.marketplace.copy_seed, Some(42));
        assert_eq!(config.marketplace.char_limit, 4000);
        assert_eq!(config.validation.min_race_mentions, 2);
        assert_eq!(config.output.plans_dir, PathBuf::from("plans"));
        assert!(config.output.overwrite);
        assert!(config
            .validation
            .forbidden_phrases
            .contains(&"unleash your".to_string()));
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original = AppConfig::default();
        original.output.root_dir = PathBuf::from("/srv/races");
        original.marketplace.rephrase_non_negotiables = true;

        original.save_to_file(&config_path).unwrap();
        let loaded = AppConfig::load_from_file(&config_path).unwrap();

        assert_eq!(loaded.output.root_dir, PathBuf::from("/srv/races"));
        assert!(loaded.marketplace.rephrase_non_negotiables);
    }

    #[test]
    fn test_resolve_missing_explicit_path_fails() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("absent.toml");
        assert!(AppConfig::resolve(Some(&missing)).is_err());
    }
}
