//! Command registry and the per-invocation execution pipeline.
//!
//! The registry is built once at startup and read-only afterwards. Each
//! invocation then moves through: resolve name → parse flags → derive
//! requirements → execute requirements in order → run the body. Every fatal
//! abort inside that pipeline is converted into one error value here; nothing
//! escapes this boundary as a panic.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use tracing::debug;

use crate::command::{Command, CommandMetadata, ParsedInvocation};
use crate::errors::{CommandError, RunError};
use crate::requirements::RequirementsFactory;
use crate::terminal::Ui;

/// Process-lifetime mapping from command name and alias to command.
#[derive(Default)]
pub struct Registry {
    commands: Vec<Box<dyn Command>>,
    index: HashMap<String, usize>,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("command name '{0}' is already registered")]
    DuplicateName(String),

    #[error("alias '{0}' collides with a registered command name or alias")]
    DuplicateAlias(String),
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Register a command under its name and, when non-empty, its alias.
    pub fn register(&mut self, command: Box<dyn Command>) -> Result<(), RegistryError> {
        let meta = command.metadata();
        if self.index.contains_key(&meta.name) {
            return Err(RegistryError::DuplicateName(meta.name));
        }
        if !meta.short_name.is_empty() && self.index.contains_key(&meta.short_name) {
            return Err(RegistryError::DuplicateAlias(meta.short_name));
        }

        let slot = self.commands.len();
        self.index.insert(meta.name, slot);
        if !meta.short_name.is_empty() {
            self.index.insert(meta.short_name, slot);
        }
        self.commands.push(command);
        Ok(())
    }

    /// Look up by name or alias.
    pub fn resolve(&self, name: &str) -> Option<&dyn Command> {
        self.index.get(name).map(|&slot| self.commands[slot].as_ref())
    }

    /// Metadata of every registered command, in registration order. Drives
    /// help generation.
    pub fn metadatas(&self) -> Vec<CommandMetadata> {
        self.commands.iter().map(|c| c.metadata()).collect()
    }
}

/// Resolves names and drives the requirements pipeline and command body.
pub struct Runner {
    registry: Registry,
    factory: RequirementsFactory,
}

impl Runner {
    pub fn new(registry: Registry, factory: RequirementsFactory) -> Self {
        Runner { registry, factory }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run one invocation. `argv[0]` is the command name or alias; the rest
    /// are that command's tokens. A name that resolves to nothing yields
    /// [`RunError::UnknownCommand`] so the caller can try plugin delegation.
    pub fn run_by_name(&self, argv: &[String], ui: &mut dyn Ui) -> Result<(), RunError> {
        let name = match argv.first() {
            Some(name) => name.as_str(),
            None => return Err(RunError::UnknownCommand { name: String::new() }),
        };

        let command = self
            .registry
            .resolve(name)
            .ok_or_else(|| RunError::UnknownCommand { name: name.to_string() })?;
        debug!(command = name, "resolved command");

        let meta = command.metadata();
        let parsed = ParsedInvocation::parse(&meta, &argv[1..])
            .map_err(|message| CommandError::Usage { message, usage: meta.rendered_usage() })?;

        // A panicking command body must become an internal error, not a
        // crash: the user-facing layer shows its diagnostic only for this
        // variant.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.execute_pipeline(command, &parsed, ui)
        }));

        match outcome {
            Ok(result) => result.map_err(RunError::Command),
            Err(payload) => {
                let detail = payload
                    .downcast_ref::<String>()
                    .cloned()
                    .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
                    .unwrap_or_else(|| "unknown panic".into());
                Err(RunError::Command(CommandError::Internal(anyhow::anyhow!(
                    "command '{}' panicked: {}",
                    name,
                    detail
                ))))
            }
        }
    }

    fn execute_pipeline(
        &self,
        command: &dyn Command,
        parsed: &ParsedInvocation,
        ui: &mut dyn Ui,
    ) -> Result<(), CommandError> {
        let requirements = command.get_requirements(&self.factory, parsed)?;
        for requirement in &requirements {
            requirement.execute()?;
        }
        command.run(ui, parsed)
    }
}
