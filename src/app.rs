//! Top-level application surface: registry construction, help rendering,
//! and the fixed unknown-command message.

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Result;
use handlebars::Handlebars;

use crate::api::{BuildpackBitsRepository, BuildpackRepository, CloudController};
use crate::command::{Command, CommandMetadata, FlagKind};
use crate::commands::{
    DeleteBuildpack, InstallPlugin, ListBuildpacks, ListPlugins, UninstallPlugin, UpdateBuildpack,
};
use crate::config::CoreConfig;
use crate::plugin::config::InstalledPlugins;
use crate::requirements::RequirementsFactory;
use crate::runner::{Registry, Runner};
use crate::{NAME, VERSION};

/// One-line description shown at the top of the app help.
const TAGLINE: &str = "A command line tool to interact with the Nimbus platform";

/// The app help is data: a template fed by registry metadata.
const APP_HELP_TEMPLATE: &str = "\
NAME:
   {{name}} - {{{tagline}}}

USAGE:
   [environment variables] {{name}} [global options] command [arguments...] [command options]

VERSION:
   {{version}}

COMMANDS:
{{#each commands}}   {{{this}}}
{{/each}}
{{#if plugin_commands}}PLUGIN COMMANDS:
{{#each plugin_commands}}   {{{this}}}
{{/each}}

{{/if}}ENVIRONMENT VARIABLES:
   NIMBUS_HOME=path/to/dir/           Override path to default config directory
   NIMBUS_PLUGIN_HOME=path/to/dir/    Override path to default plugin config directory
   NIMBUS_TRACE=debug                 Print request diagnostics to stderr
   HTTP_PROXY=proxy.example.com:8080  Enable HTTP proxying for API requests

GLOBAL OPTIONS:
   --version, -v                      Print the version
   --help, -h                         Show help
";

/// Fixed-format message for a name nothing claims. A quiet, expected
/// failure; never a crash diagnostic.
pub fn unknown_command_message(name: &str) -> String {
    format!("{tool}: '{name}' is not a registered command. See '{tool} help'", tool = NAME)
}

/// Build the process-lifetime runner: concrete repositories from config,
/// every built-in command registered once.
pub fn build_runner(config: Rc<CoreConfig>, plugin_home: PathBuf) -> Result<Runner> {
    let controller = Rc::new(CloudController::from_config(&config));
    let buildpack_repo: Rc<dyn BuildpackRepository> = controller.clone();
    let bits_repo: Rc<dyn BuildpackBitsRepository> = controller;

    let mut commands: Vec<Box<dyn Command>> = vec![
        Box::new(ListBuildpacks::new(buildpack_repo.clone())),
        Box::new(UpdateBuildpack::new(buildpack_repo.clone(), bits_repo)),
        Box::new(DeleteBuildpack::new(buildpack_repo.clone())),
        Box::new(ListPlugins::new(plugin_home.clone())),
        Box::new(UninstallPlugin::new(plugin_home.clone())),
    ];

    // install-plugin checks claimed names against every built-in name and
    // alias, including its own and the app-level help command.
    let mut built_in_names: Vec<String> = vec!["help".into(), "install-plugin".into()];
    for command in &commands {
        let meta = command.metadata();
        built_in_names.push(meta.name);
        if !meta.short_name.is_empty() {
            built_in_names.push(meta.short_name);
        }
    }
    commands.push(Box::new(InstallPlugin::new(built_in_names, plugin_home)));

    let mut registry = Registry::new();
    for command in commands {
        registry.register(command)?;
    }

    let factory = RequirementsFactory::new(config, buildpack_repo);
    Ok(Runner::new(registry, factory))
}

/// Render the app-wide help screen.
pub fn render_app_help(runner: &Runner, plugins: &InstalledPlugins) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_template_string("app_help", APP_HELP_TEMPLATE)?;

    let mut commands: Vec<String> = runner
        .registry()
        .metadatas()
        .iter()
        .map(|meta| format!("{:<24} {}", meta.name, meta.description))
        .collect();
    commands.push(format!("{:<24} {}", "help", "Show help"));

    let plugin_commands: Vec<String> = plugins
        .plugins
        .iter()
        .flat_map(|plugin| &plugin.commands)
        .map(|command| format!("{:<24} {}", command.name, command.help_text))
        .collect();

    let data = serde_json::json!({
        "name": NAME,
        "tagline": TAGLINE,
        "version": VERSION,
        "commands": commands,
        "plugin_commands": plugin_commands,
    });
    Ok(handlebars.render("app_help", &data)?)
}

/// Help for one command: a built-in's metadata, or an installed plugin
/// command's declared help text. `None` when nothing claims the name.
pub fn render_command_help(
    runner: &Runner,
    plugins: &InstalledPlugins,
    name: &str,
) -> Option<String> {
    if let Some(command) = runner.registry().resolve(name) {
        return Some(built_in_help(&command.metadata()));
    }
    plugins
        .find_command(name)
        .map(|(_, command)| format!("NAME:\n   {} - {}\n", command.name, command.help_text))
}

fn built_in_help(meta: &CommandMetadata) -> String {
    let mut help = format!(
        "NAME:\n   {} - {}\n\nUSAGE:\n   {}\n",
        meta.name,
        meta.description,
        meta.rendered_usage()
    );
    if !meta.flags.is_empty() {
        help.push_str("\nOPTIONS:\n");
        for flag in &meta.flags {
            let rendered = if flag.key.len() == 1 {
                format!("-{}", flag.key)
            } else {
                format!("--{}", flag.key)
            };
            let value_hint = match flag.kind {
                FlagKind::Bool => String::new(),
                FlagKind::Int | FlagKind::Str => " VALUE".into(),
            };
            help.push_str(&format!("   {:<16} {}\n", rendered + &value_hint, flag.description));
        }
    }
    help
}
