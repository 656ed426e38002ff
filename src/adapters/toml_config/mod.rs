// TOML config adapter - Loading and saving RipConfig as TOML files

use std::path::{Path, PathBuf};

use crate::config::RipConfig;
use crate::domain::errors::*;

/// Locations searched when no config file is given, in order
const DEFAULT_CONFIG_PATHS: &[&str] = &["/etc/autorip/autorip.toml", "autorip.toml"];

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// First existing default config file, if any
    pub fn discover() -> Option<PathBuf> {
        Self::discover_in(DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from))
    }

    fn discover_in(candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
        candidates.into_iter().find(|path| path.is_file())
    }

    /// Parse configuration from TOML text; missing keys keep their defaults
    pub fn parse(toml_content: &str) -> Result<RipConfig, DomainError> {
        toml::from_str(toml_content)
            .map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<RipConfig, DomainError> {
        if !path.exists() {
            return Err(DomainError::FsFail(format!(
                "Config file does not exist: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::FsFail(format!("Failed to read config file: {}", e)))?;
        tracing::info!(path = %path.display(), "Loading configuration");
        Self::parse(&content)
    }

    /// Serialize configuration to TOML text
    pub fn serialize(config: &RipConfig) -> Result<String, DomainError> {
        toml::to_string_pretty(config)
            .map_err(|e| DomainError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Write configuration to a file, creating parent directories
    pub fn save(config: &RipConfig, path: &Path) -> Result<(), DomainError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::FsFail(format!("Failed to create config directory: {}", e))
            })?;
        }
        let content = Self::serialize(config)?;
        std::fs::write(path, content)
            .map_err(|e| DomainError::FsFail(format!("Failed to write config file: {}", e)))
    }
}
