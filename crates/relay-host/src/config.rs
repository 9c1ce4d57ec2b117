//! Host configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default nesting limit for call frames
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

/// Tunables of a [`crate::World`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Deepest frame allowed; top-level calls run at depth 0
    pub max_call_depth: usize,
    /// Balance credited to accounts made with [`crate::World::create_account`]
    ///
    /// TOML integers are 64-bit; the host widens this on credit.
    pub genesis_balance: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            genesis_balance: 0,
        }
    }
}

impl HostConfig {
    /// Parse from TOML text; missing keys keep their defaults
    ///
    /// # Errors
    /// Returns error if the text is not valid TOML or the values are unusable
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_call_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_call_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_text_yields_defaults() {
        let config = HostConfig::from_toml_str("").unwrap();
        assert_eq!(config, HostConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = HostConfig::from_toml_str("genesis_balance = 500").unwrap();
        assert_eq!(config.genesis_balance, 500);
        assert_eq!(config.max_call_depth, DEFAULT_MAX_CALL_DEPTH);
    }

    #[test]
    fn balance_accepts_toml_integer_range() {
        let config = HostConfig::from_toml_str("genesis_balance = 9223372036854775807").unwrap();
        assert_eq!(config.genesis_balance, u64::try_from(i64::MAX).unwrap());
    }

    #[test]
    fn rejects_zero_depth() {
        let result = HostConfig::from_toml_str("max_call_depth = 0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = HostConfig::from_toml_str("gas_limit = 10");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_call_depth = 8").unwrap();
        writeln!(file, "genesis_balance = 1000").unwrap();

        let config = HostConfig::load(file.path()).unwrap();
        assert_eq!(config.max_call_depth, 8);
        assert_eq!(config.genesis_balance, 1000);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = HostConfig::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
