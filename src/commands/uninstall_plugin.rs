//! `uninstall-plugin`: remove an installed plugin entry by name.

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;

use crate::command::{Command, CommandMetadata, ParsedInvocation};
use crate::errors::CommandError;
use crate::plugin::config::InstalledPlugins;
use crate::requirements::{Requirement, RequirementsFactory};
use crate::terminal::Ui;

pub struct UninstallPlugin {
    plugin_home: PathBuf,
}

impl UninstallPlugin {
    pub fn new(plugin_home: PathBuf) -> Self {
        UninstallPlugin { plugin_home }
    }
}

impl Command for UninstallPlugin {
    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "uninstall-plugin".into(),
            short_name: String::new(),
            description: "Uninstall a plugin by name".into(),
            usage: "{tool} uninstall-plugin PLUGIN_NAME".into(),
            flags: vec![],
            skip_flag_parsing: false,
        }
    }

    fn get_requirements(
        &self,
        _factory: &RequirementsFactory,
        args: &ParsedInvocation,
    ) -> Result<Vec<Rc<dyn Requirement>>, CommandError> {
        if args.args().len() != 1 {
            return Err(self.metadata().usage_error("Requires a plugin name as argument"));
        }
        Ok(vec![])
    }

    fn run(&self, ui: &mut dyn Ui, args: &ParsedInvocation) -> Result<(), CommandError> {
        let name = &args.args()[0];

        let mut table = InstalledPlugins::load(&self.plugin_home)
            .context("Failed to load plugin configuration")?;

        if table.remove_plugin(name).is_none() {
            return Err(CommandError::Failed(format!("Plugin {} does not exist.", name)));
        }
        table.save(&self.plugin_home).context("Failed to save plugin configuration")?;

        ui.ok();
        ui.say(&format!("Plugin {} successfully uninstalled.", name));
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
    fn removes_an_installed_plugin() {
        let dir = tempfile::tempdir().unwrap();
        let table = InstalledPlugins {
            plugins: vec![InstalledPlugin {
                name: "Repeat".into(),
                location: dir.path().join("repeat"),
                commands: vec![PluginCommand { name: "repeat".into(), help_text: "".into() }],
            }],
        };
        table.save(dir.path()).unwrap();

        let command = UninstallPlugin::new(dir.path().to_path_buf());
        let args = ParsedInvocation::from_positionals(&["Repeat".to_string()]);
        let mut ui = BufferUi::new();
        command.run(&mut ui, &args).unwrap();

        assert!(InstalledPlugins::load(dir.path()).unwrap().plugins.is_empty());
        assert!(ui.output().contains("successfully uninstalled"));
    }

    #[test]
    fn unknown_plugin_is_a_quiet_failure() {
        let dir = tempfile::tempdir().unwrap();
        let command = UninstallPlugin::new(dir.path().to_path_buf());
        let args = ParsedInvocation::from_positionals(&["Ghost".to_string()]);
        let mut ui = BufferUi::new();
        let err = command.run(&mut ui, &args).unwrap_err();
        assert!(err.is_quiet());
        assert!(err.to_string().contains("does not exist"));
    }
}
