use std::fs;
use std::io;
use std::path::Path;

use fk_core::{DEFAULT_SEED_TOKEN, ManagedSetStore, Target, Token};
use serde::Deserialize;

use crate::error::{Result, StoreError};

/// File name looked up in the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Optional `config.toml`:
///
/// ```toml
/// seed_token = "ENABLE_DEBUG_TOOLS"
/// targets = ["standalone", "ios", "android"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Token seeded into the managed list on first run.
    pub seed_token: String,
    /// Targets written by "apply to all", in order.
    pub targets: Vec<Target>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_token: DEFAULT_SEED_TOKEN.to_string(),
            targets: Target::known().collect(),
        }
    }
}

impl Config {
    /// Load from `path`; a missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let config = Self::from_toml_str(&content)?;
                tracing::debug!("loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(StoreError::Config(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn managed_set_store(&self) -> Result<ManagedSetStore> {
        ManagedSetStore::with_seed(&self.seed_token)
            .map_err(|e| StoreError::Config(format!("seed_token: {e}")))
    }

    fn validate(&self) -> Result<()> {
        Token::parse(&self.seed_token)
            .map_err(|e| StoreError::Config(format!("seed_token: {e}")))?;
        if self.targets.is_empty() {
            return Err(StoreError::Config("targets must not be empty".into()));
        }
        if self.targets.iter().any(|t| t.is_unknown()) {
            return Err(StoreError::Config(
                "targets must not include 'unknown'".into(),
            ));
        }
        Ok(())
    }
}
