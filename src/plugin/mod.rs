//! Out-of-process plugin bridge.
//!
//! A plugin is a separately built binary. The host talks to it over
//! newline-delimited JSON on the child's stdin/stdout ([`rpc`]); the plugin's
//! own user-facing prints go to stderr, which the host leaves attached to the
//! terminal. Two session shapes exist: a metadata query at install time, and
//! a per-invocation session during which the plugin may call back into the
//! host's command pipeline zero or more times.

pub mod client;
pub mod config;
pub mod host;
pub mod rpc;

use serde::{Deserialize, Serialize};

/// What a plugin declares about itself during the metadata handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub name: String,
    pub commands: Vec<PluginCommand>,
}

/// One command name a plugin claims, with its help line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginCommand {
    pub name: String,
    pub help_text: String,
}
