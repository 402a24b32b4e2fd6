//! `plugins`: list installed plugins and the commands they provide.

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;

use crate::command::{Command, CommandMetadata, ParsedInvocation};
use crate::errors::CommandError;
use crate::plugin::config::InstalledPlugins;
use crate::requirements::{Requirement, RequirementsFactory};
use crate::terminal::Ui;

pub struct ListPlugins {
    plugin_home: PathBuf,
}

impl ListPlugins {
    pub fn new(plugin_home: PathBuf) -> Self {
        ListPlugins { plugin_home }
    }
}

impl Command for ListPlugins {
    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "plugins".into(),
            short_name: String::new(),
            description: "List all available plugin commands".into(),
            usage: "{tool} plugins".into(),
            flags: vec![],
            skip_flag_parsing: false,
        }
    }

    fn get_requirements(
        &self,
        _factory: &RequirementsFactory,
        args: &ParsedInvocation,
    ) -> Result<Vec<Rc<dyn Requirement>>, CommandError> {
        if !args.args().is_empty() {
            return Err(self.metadata().usage_error("No arguments expected"));
        }
        Ok(vec![])
    }

    fn run(&self, ui: &mut dyn Ui, _args: &ParsedInvocation) -> Result<(), CommandError> {
        let table = InstalledPlugins::load(&self.plugin_home)
            .context("Failed to load plugin configuration")?;

        if table.plugins.is_empty() {
            ui.say("No plugins installed");
            return Ok(());
        }

        ui.say("Listing installed plugins...");
        ui.say("");
        ui.say(&format!("{:<16} {:<20} {}", "plugin", "command", "help"));
        for plugin in &table.plugins {
            for command in &plugin.commands {
                ui.say(&format!("{:<16} {:<20} {}", plugin.name, command.name, command.help_text));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::plugin::config::InstalledPlugin;
    use crate::plugin::PluginCommand;
    use crate::terminal::BufferUi;

    #[test]
    fn lists_every_plugin_command() {
        let dir = tempfile::tempdir().unwrap();
        let table = InstalledPlugins {
            plugins: vec![InstalledPlugin {
                name: "Repeat".into(),
                location: dir.path().join("repeat"),
                commands: vec![PluginCommand {
                    name: "repeat".into(),
                    help_text: "Repeat a command".into(),
                }],
            }],
        };
        table.save(dir.path()).unwrap();

        let command = ListPlugins::new(dir.path().to_path_buf());
        let mut ui = BufferUi::new();
        command.run(&mut ui, &ParsedInvocation::default()).unwrap();
        assert!(ui.output().contains("Repeat"));
        assert!(ui.output().contains("repeat"));
    }

    #[test]
    fn reports_when_nothing_is_installed() {
        let dir = tempfile::tempdir().unwrap();
        let command = ListPlugins::new(dir.path().to_path_buf());
        let mut ui = BufferUi::new();
        command.run(&mut ui, &ParsedInvocation::default()).unwrap();
        assert!(ui.output().contains("No plugins installed"));
    }
}
