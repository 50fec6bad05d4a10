//! Configuration types for SandboxMeta
//!
//! Configuration is read from TOML. Every section is optional and falls
//! back to its default.

use crate::error::{Error, Result};
use crate::keys::NETNS_PATH_KEY;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration for SandboxMeta
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Relay configuration
    pub relay: RelayConfig,
}

impl Config {
    /// Parse configuration from a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::configuration(format!("failed to parse config: {e}")))
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }
}

/// Which keys a service forwards from an incoming call to its outgoing calls
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Keys looked up on the incoming context and re-attached downstream
    pub forward_keys: Vec<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            forward_keys: vec![NETNS_PATH_KEY.to_string()],
        }
    }
}
