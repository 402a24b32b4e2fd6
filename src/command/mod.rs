//! The `Command` capability and its static metadata.
//!
//! Every registered command exposes three things: metadata (for dispatch and
//! help), a requirements derivation step, and a body. The registry stores
//! commands as trait objects; no hierarchy beyond the one trait.

pub mod args;

pub use args::ParsedInvocation;

use std::rc::Rc;

use crate::errors::CommandError;
use crate::requirements::{Requirement, RequirementsFactory};
use crate::terminal::Ui;
use crate::NAME;

/// What kind of value a flag carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Bool,
    Int,
    Str,
}

/// Declaration of one flag a command accepts. A command's body may only read
/// flags it declared here.
#[derive(Debug, Clone)]
pub struct FlagSpec {
    pub key: String,
    pub kind: FlagKind,
    pub description: String,
}

impl FlagSpec {
    pub fn bool(key: &str, description: &str) -> Self {
        FlagSpec { key: key.into(), kind: FlagKind::Bool, description: description.into() }
    }

    pub fn int(key: &str, description: &str) -> Self {
        FlagSpec { key: key.into(), kind: FlagKind::Int, description: description.into() }
    }

    pub fn string(key: &str, description: &str) -> Self {
        FlagSpec { key: key.into(), kind: FlagKind::Str, description: description.into() }
    }
}

/// Static description of a command: dispatch names, help text, flag set.
#[derive(Debug, Clone, Default)]
pub struct CommandMetadata {
    pub name: String,
    /// Optional alias; empty means none. Must not collide with any name.
    pub short_name: String,
    pub description: String,
    /// Usage template; `{tool}` is replaced with the invocation name.
    pub usage: String,
    pub flags: Vec<FlagSpec>,
    /// When set, every token is treated as a positional argument.
    pub skip_flag_parsing: bool,
}

impl CommandMetadata {
    /// Usage text with the tool-name placeholder substituted.
    pub fn rendered_usage(&self) -> String {
        self.usage.replace("{tool}", NAME)
    }

    /// Usage error carrying this command's usage text.
    pub fn usage_error(&self, message: impl Into<String>) -> CommandError {
        CommandError::Usage { message: message.into(), usage: self.rendered_usage() }
    }
}

/// A named, self-describing unit of work.
pub trait Command {
    /// Pure; used for dispatch and help generation.
    fn metadata(&self) -> CommandMetadata;

    /// Validate argument shape and construct the preconditions to run, in
    /// order. A shape failure here aborts with usage help before any
    /// requirement executes.
    fn get_requirements(
        &self,
        factory: &RequirementsFactory,
        args: &ParsedInvocation,
    ) -> Result<Vec<Rc<dyn Requirement>>, CommandError>;

    /// The command body. Runs only after every requirement succeeded.
    fn run(&self, ui: &mut dyn Ui, args: &ParsedInvocation) -> Result<(), CommandError>;
}
