//! Plugin side of the bridge.
//!
//! A plugin binary implements [`NimbusPlugin`] and hands it to [`serve`] from
//! its `main`. The serve loop answers the host's metadata query and, on an
//! invocation, passes the plugin a [`CliConnection`]: its single capability
//! is running a host command and getting that command's captured output back.
//!
//! The protocol owns stdout; anything the plugin wants the user to see goes
//! to stderr, which the host leaves attached to the terminal.

use std::io::{self, BufRead, BufReader, Write};

use thiserror::Error;

use crate::plugin::rpc::{read_message, write_message, HostMessage, PluginMessage, ProtocolError};
use crate::plugin::PluginMetadata;

/// A plugin's entry points. `metadata` must be pure; `run` executes one
/// invocation synchronously and may use the connection zero or more times.
pub trait NimbusPlugin {
    fn metadata(&self) -> PluginMetadata;

    /// `args` is the full argument vector for the invocation, the claimed
    /// command name at position zero. An `Err` becomes the session's fatal
    /// failure message on the host side.
    fn run(&self, connection: &mut CliConnection<'_>, args: &[String]) -> anyhow::Result<()>;
}

/// Handle for issuing nested host-command invocations. Lives for one
/// invocation; discarded when the plugin's `run` returns.
pub struct CliConnection<'a> {
    reader: &'a mut dyn BufRead,
    writer: &'a mut dyn Write,
}

/// Failure of one nested invocation. Deliberately a value the plugin
/// inspects, so one failed call never ends the loop for the rest.
#[derive(Debug, Error)]
pub enum PluginCliError {
    /// The host ran the command and it failed. Output written before the
    /// failure is preserved.
    #[error("{message}")]
    Command { output: String, message: String },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl<'a> CliConnection<'a> {
    /// Run a host command by argument vector, returning its captured output.
    pub fn cli_command<S: AsRef<str>>(&mut self, args: &[S]) -> Result<String, PluginCliError> {
        let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();
        write_message(&mut self.writer, &PluginMessage::CliCommand { args })?;

        match read_message::<_, HostMessage>(&mut self.reader)? {
            HostMessage::CliResult { output, error: None } => Ok(output),
            HostMessage::CliResult { output, error: Some(message) } => {
                Err(PluginCliError::Command { output, message })
            }
            _ => Err(ProtocolError::Unexpected("nested command call").into()),
        }
    }
}

/// Serve one host session over stdin/stdout. Plugin binaries call this from
/// `main`.
pub fn serve<P: NimbusPlugin>(plugin: &P) -> anyhow::Result<()> {
    let mut reader = BufReader::new(io::stdin());
    let mut writer = io::stdout();
    serve_with(plugin, &mut reader, &mut writer).map_err(Into::into)
}

/// The serve loop over explicit streams, testable without a host process.
pub fn serve_with<P: NimbusPlugin>(
    plugin: &P,
    mut reader: &mut dyn BufRead,
    mut writer: &mut dyn Write,
) -> Result<(), ProtocolError> {
    loop {
        let message = match read_message::<_, HostMessage>(&mut reader) {
            Ok(message) => message,
            // Host closed the channel: the session is over.
            Err(ProtocolError::ChannelClosed) => return Ok(()),
            Err(e) => return Err(e),
        };

        match message {
            HostMessage::GetMetadata => {
                write_message(&mut writer, &PluginMessage::Metadata { metadata: plugin.metadata() })?;
            }
            HostMessage::Invoke { args } => {
                let error = {
                    let mut connection =
                        CliConnection { reader: &mut *reader, writer: &mut *writer };
                    plugin.run(&mut connection, &args).err().map(|e| e.to_string())
                };
                write_message(&mut writer, &PluginMessage::Done { error })?;
                return Ok(());
            }
            HostMessage::CliResult { .. } => {
                return Err(ProtocolError::Unexpected("session start"))
            }
        }
    }
}
