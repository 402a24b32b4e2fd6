//! Wire protocol between host and plugin.
//!
//! One JSON message per line, strictly alternating request/response. The
//! host writes [`HostMessage`] values; the plugin writes [`PluginMessage`]
//! values. Neither side ever has two requests in flight.

use std::io::{self, BufRead, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plugin::PluginMetadata;

/// Messages the host sends to a plugin process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    /// Ask the plugin to declare itself; the reply is `Metadata`.
    GetMetadata,
    /// Start one invocation. `args` is the full argument vector, command
    /// name at position zero.
    Invoke { args: Vec<String> },
    /// Reply to a `CliCommand` callback: the nested command's captured
    /// output and its failure message, if any.
    CliResult { output: String, error: Option<String> },
}

/// Messages a plugin sends to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PluginMessage {
    /// Reply to `GetMetadata`.
    Metadata { metadata: PluginMetadata },
    /// Ask the host to run a command through its own pipeline; the reply is
    /// `CliResult`.
    CliCommand { args: Vec<String> },
    /// The invocation finished. A message here is a plugin-level fatal
    /// failure, distinct from individual nested-call errors.
    Done { error: Option<String> },
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The peer closed its stream mid-session.
    #[error("plugin channel closed unexpectedly")]
    ChannelClosed,

    #[error("malformed plugin protocol message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unexpected plugin protocol message during {0}")]
    Unexpected(&'static str),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Serialize one message as a single line and flush it.
pub fn write_message<W: Write, T: Serialize>(writer: &mut W, message: &T) -> Result<(), ProtocolError> {
    let line = serde_json::to_string(message)?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read the next message line. EOF is `ChannelClosed`.
pub fn read_message<R: BufRead, T: DeserializeOwned>(reader: &mut R) -> Result<T, ProtocolError> {
    let mut line = String::new();
    let read = reader.read_line(&mut line)?;
    if read == 0 {
        return Err(ProtocolError::ChannelClosed);
    }
    Ok(serde_json::from_str(line.trim_end())?)
}
