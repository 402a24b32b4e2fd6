#![forbid(unsafe_code)]

//! Demo plugin: a command that never calls back into the host.

use std::process::exit;

use nimbus::plugin::client::{serve, CliConnection, NimbusPlugin};
use nimbus::plugin::{PluginCommand, PluginMetadata};

struct HistoryPlugin;

impl NimbusPlugin for HistoryPlugin {
    fn metadata(&self) -> PluginMetadata {
        PluginMetadata {
            name: "History".into(),
            commands: vec![PluginCommand {
                name: "history".into(),
                help_text: "Display a brief history of the Nimbus project".into(),
            }],
        }
    }

    fn run(&self, _connection: &mut CliConnection<'_>, _args: &[String]) -> anyhow::Result<()> {
        eprintln!(
            "\
2019  - Nimbus prototype ships
2021  - First public platform release
2023  - Plugin interface stabilizes
2025  - CLI rewritten around the plugin bridge"
        );
        Ok(())
    }
}

fn main() {
    if let Err(e) = serve(&HistoryPlugin) {
        eprintln!("history plugin failed: {:#}", e);
        exit(1);
    }
}
