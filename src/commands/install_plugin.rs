//! `install-plugin`: register a plugin binary with the tool.
//!
//! Runs the metadata-query handshake against the binary and records the
//! plugin in the plugin config. A command name that collides with a built-in
//! or with another installed plugin is rejected before anything is written.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context;

use crate::command::{Command, CommandMetadata, ParsedInvocation};
use crate::errors::CommandError;
use crate::plugin::config::{InstalledPlugin, InstalledPlugins};
use crate::plugin::host;
use crate::requirements::{Requirement, RequirementsFactory};
use crate::terminal::Ui;

pub struct InstallPlugin {
    /// Every name and alias the built-in registry claims, fixed at startup.
    built_in_names: Vec<String>,
    plugin_home: PathBuf,
}

impl InstallPlugin {
    pub fn new(built_in_names: Vec<String>, plugin_home: PathBuf) -> Self {
        InstallPlugin { built_in_names, plugin_home }
    }
}

impl Command for InstallPlugin {
    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "install-plugin".into(),
            short_name: String::new(),
            description: "Install a plugin from a local binary".into(),
            usage: "{tool} install-plugin PATH_TO_PLUGIN_BINARY".into(),
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
            return Err(self.metadata().usage_error("Requires a path to a plugin binary"));
        }
        Ok(vec![])
    }

    fn run(&self, ui: &mut dyn Ui, args: &ParsedInvocation) -> Result<(), CommandError> {
        let binary = Path::new(&args.args()[0]);
        if !binary.exists() {
            return Err(CommandError::Failed(format!(
                "File {} does not exist.",
                binary.display()
            )));
        }

        ui.say(&format!("Installing plugin {}...", binary.display()));

        let metadata = host::fetch_metadata(binary)
            .map_err(|e| CommandError::Failed(format!("{:#}", e)))?;

        let mut table = InstalledPlugins::load(&self.plugin_home)
            .context("Failed to load plugin configuration")?;

        if table.find_plugin(&metadata.name).is_some() {
            return Err(CommandError::Failed(format!(
                "Plugin {} is already installed. Uninstall it first.",
                metadata.name
            )));
        }
        for command in &metadata.commands {
            if self.built_in_names.iter().any(|n| n == &command.name) {
                return Err(CommandError::Failed(format!(
                    "Command '{}' is a registered command. Unable to install plugin {}.",
                    command.name, metadata.name
                )));
            }
            if table.claims_command(&command.name) {
                return Err(CommandError::Failed(format!(
                    "Command '{}' is provided by an installed plugin. Unable to install plugin {}.",
                    command.name, metadata.name
                )));
            }
        }

        let canonical = binary
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", binary.display()))?;
        let name = metadata.name.clone();
        table.plugins.push(InstalledPlugin {
            name: metadata.name,
            location: canonical,
            commands: metadata.commands,
        });
        table.save(&self.plugin_home).context("Failed to save plugin configuration")?;

        ui.ok();
        ui.say(&format!("Plugin {} successfully installed.", name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::terminal::BufferUi;

    #[test]
    fn missing_binary_is_a_quiet_failure() {
        let dir = tempfile::tempdir().unwrap();
        let command = InstallPlugin::new(vec![], dir.path().to_path_buf());
        let args = ParsedInvocation::from_positionals(&["/no/such/binary".to_string()]);

        let mut ui = BufferUi::new();
        let err = command.run(&mut ui, &args).unwrap_err();
        assert!(err.is_quiet());
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn wrong_argument_count_is_a_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let command = InstallPlugin::new(vec![], dir.path().to_path_buf());
        let config = Rc::new(crate::config::CoreConfig::default());
        let repo = Rc::new(NoRemote);
        let factory = RequirementsFactory::new(config, repo);

        let err = command
            .get_requirements(&factory, &ParsedInvocation::default())
            .unwrap_err();
        assert!(matches!(err, CommandError::Usage { .. }));
    }

    struct NoRemote;

    impl crate::api::BuildpackRepository for NoRemote {
        fn list(&self) -> Result<Vec<crate::api::Buildpack>, crate::api::ApiError> {
            unreachable!()
        }
        fn find_by_name(&self, name: &str) -> Result<crate::api::Buildpack, crate::api::ApiError> {
            Err(crate::api::ApiError::not_found("Buildpack", name))
        }
        fn update(
            &self,
            _: &crate::api::Buildpack,
        ) -> Result<crate::api::Buildpack, crate::api::ApiError> {
            unreachable!()
        }
        fn delete(&self, _: &str) -> Result<(), crate::api::ApiError> {
            unreachable!()
        }
    }
}
