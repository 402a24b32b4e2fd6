//! Installed-plugin configuration.
//!
//! A JSON file under the plugin home directory records each installed
//! plugin's name, binary location, and the command names it claims. Loaded
//! at dispatch time to decide whether an unknown command name belongs to a
//! plugin.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::CoreConfig;
use crate::plugin::PluginCommand;

const PLUGINS_FILE: &str = "plugins.json";

/// One installed plugin entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPlugin {
    pub name: String,
    pub location: PathBuf,
    pub commands: Vec<PluginCommand>,
}

/// The full installed-plugin table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPlugins {
    #[serde(default)]
    pub plugins: Vec<InstalledPlugin>,
}

impl InstalledPlugins {
    /// Plugin home: `NIMBUS_PLUGIN_HOME` override, else `<config home>/plugins`.
    pub fn home_dir() -> PathBuf {
        if let Ok(home) = env::var("NIMBUS_PLUGIN_HOME") {
            return PathBuf::from(home);
        }
        CoreConfig::home_dir().join("plugins")
    }

    /// Load the table from a plugin home, treating a missing file as empty.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(PLUGINS_FILE);
        if !path.exists() {
            return Ok(InstalledPlugins::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read plugin config at {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Malformed plugin config at {}", path.display()))
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create plugin home {}", dir.display()))?;
        let path = dir.join(PLUGINS_FILE);
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, raw)
            .with_context(|| format!("Failed to write plugin config at {}", path.display()))
    }

    pub fn find_plugin(&self, name: &str) -> Option<&InstalledPlugin> {
        self.plugins.iter().find(|p| p.name == name)
    }

    /// The plugin claiming a given command name, if any.
    pub fn find_command(&self, name: &str) -> Option<(&InstalledPlugin, &PluginCommand)> {
        for plugin in &self.plugins {
            if let Some(command) = plugin.commands.iter().find(|c| c.name == name) {
                return Some((plugin, command));
            }
        }
        None
    }

    pub fn claims_command(&self, name: &str) -> bool {
        self.find_command(name).is_some()
    }

    pub fn remove_plugin(&mut self, name: &str) -> Option<InstalledPlugin> {
        let slot = self.plugins.iter().position(|p| p.name == name)?;
        Some(self.plugins.remove(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repeat_entry() -> InstalledPlugin {
        InstalledPlugin {
            name: "Repeat".into(),
            location: PathBuf::from("/opt/plugins/repeat"),
            commands: vec![PluginCommand {
                name: "repeat".into(),
                help_text: "Repeat a command for a list of targets".into(),
            }],
        }
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let table = InstalledPlugins { plugins: vec![repeat_entry()] };
        table.save(dir.path()).unwrap();

        let loaded = InstalledPlugins::load(dir.path()).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = InstalledPlugins::load(dir.path()).unwrap();
        assert!(loaded.plugins.is_empty());
    }

    #[test]
    fn command_lookup_finds_the_owning_plugin() {
        let table = InstalledPlugins { plugins: vec![repeat_entry()] };
        let (plugin, command) = table.find_command("repeat").unwrap();
        assert_eq!(plugin.name, "Repeat");
        assert_eq!(command.name, "repeat");
        assert!(!table.claims_command("buildpacks"));
    }

    #[test]
    fn remove_plugin_by_name() {
        let mut table = InstalledPlugins { plugins: vec![repeat_entry()] };
        assert!(table.remove_plugin("Repeat").is_some());
        assert!(table.remove_plugin("Repeat").is_none());
        assert!(table.plugins.is_empty());
    }
}
