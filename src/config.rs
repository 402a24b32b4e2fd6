//! Persisted tool configuration: API endpoint, login token, targeted
//! org/space. Load-only here; the login/target flows that write it live
//! outside this crate's scope.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.json";

/// Snapshot of the persisted configuration, read once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Cloud controller base URL.
    #[serde(default)]
    pub api_endpoint: Option<String>,

    /// Bearer token from the last login.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Targeted organization name.
    #[serde(default)]
    pub organization: Option<String>,

    /// Targeted space name.
    #[serde(default)]
    pub space: Option<String>,
}

impl CoreConfig {
    /// Config directory: `NIMBUS_HOME` override, else `~/.nimbus`.
    pub fn home_dir() -> PathBuf {
        if let Ok(home) = env::var("NIMBUS_HOME") {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .map(|h| h.join(".nimbus"))
            .unwrap_or_else(|| PathBuf::from(".nimbus"))
    }

    /// Load the config file, treating a missing file as empty defaults.
    pub fn load() -> Result<Self> {
        let path = Self::home_dir().join(CONFIG_FILE);
        if !path.exists() {
            return Ok(CoreConfig::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed config at {}", path.display()))?;
        Ok(config)
    }

    pub fn is_logged_in(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn has_target(&self) -> bool {
        self.organization.as_deref().is_some_and(|o| !o.is_empty())
            && self.space.as_deref().is_some_and(|s| !s.is_empty())
    }
}
