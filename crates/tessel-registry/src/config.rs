use std::path::Path;

use serde::{Deserialize, Serialize};
use tessel_types::DataPriority;

use crate::error::{RegistryError, RegistryResult};

/// Configuration for a processor registry and its facade.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Priority used by `offer_data` when the caller gives none.
    pub default_priority: DataPriority,
    /// Turn processor panics into ERROR results instead of unwinding
    /// through the caller.
    pub capture_panics: bool,
    /// Maximum number of processors in one chain.
    pub max_chain_length: usize,
    /// Whether offer hooks are consulted before writes.
    pub hooks_enabled: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_priority: DataPriority::DataManipulator,
            capture_panics: true,
            max_chain_length: 16,
            hooks_enabled: true,
        }
    }
}

impl RegistryConfig {
    /// A configuration that never vetoes: offer hooks are skipped.
    pub fn permissive() -> Self {
        Self {
            hooks_enabled: false,
            ..Default::default()
        }
    }

    pub fn from_toml_str(content: &str) -> RegistryResult<Self> {
        let config: RegistryConfig =
            toml::from_str(content).map_err(|e| RegistryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> RegistryResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RegistryError::Config(format!("failed to read '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml(&self) -> RegistryResult<String> {
        toml::to_string_pretty(self).map_err(|e| RegistryError::Config(e.to_string()))
    }

    fn validate(&self) -> RegistryResult<()> {
        if self.max_chain_length == 0 {
            return Err(RegistryError::Config(
                "max_chain_length must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.default_priority, DataPriority::DataManipulator);
        assert!(config.capture_panics);
        assert_eq!(config.max_chain_length, 16);
        assert!(!RegistryConfig::permissive().hooks_enabled);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = RegistryConfig::from_toml_str("default_priority = \"POST_MERGE\"").unwrap();
        assert_eq!(config.default_priority, DataPriority::PostMerge);
        assert_eq!(config.max_chain_length, 16);
    }

    #[test]
    fn zero_chain_length_is_rejected() {
        let err = RegistryConfig::from_toml_str("max_chain_length = 0").unwrap_err();
        assert!(matches!(err, RegistryError::Config(_)));
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tessel.toml");
        let config = RegistryConfig {
            capture_panics: false,
            ..RegistryConfig::permissive()
        };
        std::fs::write(&path, config.to_toml().unwrap()).unwrap();
        assert_eq!(RegistryConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RegistryConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
