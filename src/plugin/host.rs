//! Host side of the plugin bridge.
//!
//! Spawns plugin binaries with piped stdin/stdout (stderr stays on the
//! terminal for the plugin's own prints) and drives the two session shapes:
//! the metadata query and the per-invocation session. During an invocation
//! the host serves the plugin's `CliCommand` callbacks by running them
//! through the same [`Runner`] as a direct invocation, with output captured
//! into a buffer. A nested failure becomes a value in the reply; it never
//! crosses the process boundary as a crash.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, Command as ProcessCommand, Stdio};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use crate::plugin::rpc::{read_message, write_message, HostMessage, PluginMessage, ProtocolError};
use crate::plugin::PluginMetadata;
use crate::runner::Runner;
use crate::terminal::BufferUi;

fn spawn_plugin(binary: &Path) -> Result<Child> {
    ProcessCommand::new(binary)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .with_context(|| format!("Failed to start plugin binary {}", binary.display()))
}

fn plugin_channels(child: &mut Child) -> Result<(impl Write, BufReader<impl std::io::Read>)> {
    let stdin = child.stdin.take().ok_or_else(|| anyhow!("plugin stdin unavailable"))?;
    let stdout = child.stdout.take().ok_or_else(|| anyhow!("plugin stdout unavailable"))?;
    Ok((stdin, BufReader::new(stdout)))
}

/// Metadata-query session: ask a plugin binary to declare itself.
pub fn fetch_metadata(binary: &Path) -> Result<PluginMetadata> {
    let mut child = spawn_plugin(binary)?;
    let (mut to_plugin, mut from_plugin) = plugin_channels(&mut child)?;

    let metadata = (|| -> Result<PluginMetadata> {
        write_message(&mut to_plugin, &HostMessage::GetMetadata)?;
        match read_message::<_, PluginMessage>(&mut from_plugin)? {
            PluginMessage::Metadata { metadata } => Ok(metadata),
            _ => Err(ProtocolError::Unexpected("metadata query").into()),
        }
    })();

    // Closing stdin ends the plugin's serve loop.
    drop(to_plugin);
    let _ = child.wait();

    metadata.with_context(|| format!("{} is not a valid nimbus plugin", binary.display()))
}

/// Per-invocation session: hand the plugin the full argument vector and
/// serve its callbacks until it reports done. Returns the plugin's own
/// fatal-failure message, if it ended with one.
pub fn run_plugin_command(runner: &Runner, binary: &Path, argv: &[String]) -> Result<Option<String>> {
    debug!(plugin = %binary.display(), command = argv.first().map(String::as_str), "starting plugin session");
    let mut child = spawn_plugin(binary)?;
    let (mut to_plugin, mut from_plugin) = plugin_channels(&mut child)?;

    let outcome = serve_invocation(runner, &mut to_plugin, &mut from_plugin, argv);

    drop(to_plugin);
    let _ = child.wait();

    outcome.context("Plugin session failed")
}

/// The invocation loop, separated from process plumbing so tests can drive
/// it over in-memory streams.
pub fn serve_invocation<R: BufRead, W: Write>(
    runner: &Runner,
    to_plugin: &mut W,
    from_plugin: &mut R,
    argv: &[String],
) -> Result<Option<String>, ProtocolError> {
    write_message(to_plugin, &HostMessage::Invoke { args: argv.to_vec() })?;

    loop {
        match read_message::<_, PluginMessage>(from_plugin)? {
            PluginMessage::CliCommand { args } => {
                debug!(args = ?args, "serving nested plugin command");
                let mut ui = BufferUi::new();
                let error = match runner.run_by_name(&args, &mut ui) {
                    Ok(()) => None,
                    Err(e) => Some(e.to_string()),
                };
                write_message(
                    to_plugin,
                    &HostMessage::CliResult { output: ui.into_output(), error },
                )?;
            }
            PluginMessage::Done { error } => return Ok(error),
            PluginMessage::Metadata { .. } => {
                return Err(ProtocolError::Unexpected("invocation session"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::rc::Rc;

    use crate::api::{ApiError, Buildpack, BuildpackRepository};
    use crate::commands::ListBuildpacks;
    use crate::config::CoreConfig;
    use crate::requirements::RequirementsFactory;
    use crate::runner::Registry;

    struct StaticRepo;

    impl BuildpackRepository for StaticRepo {
        fn list(&self) -> Result<Vec<Buildpack>, ApiError> {
            Ok(vec![Buildpack { guid: "bp-1".into(), name: "go-buildpack".into(), ..Default::default() }])
        }
        fn find_by_name(&self, name: &str) -> Result<Buildpack, ApiError> {
            Err(ApiError::not_found("Buildpack", name))
        }
        fn update(&self, _: &Buildpack) -> Result<Buildpack, ApiError> {
            unreachable!()
        }
        fn delete(&self, _: &str) -> Result<(), ApiError> {
            unreachable!()
        }
    }

    fn test_runner(logged_in: bool) -> Runner {
        let repo = Rc::new(StaticRepo);
        let config = Rc::new(CoreConfig {
            access_token: logged_in.then(|| "tok".to_string()),
            ..Default::default()
        });
        let factory = RequirementsFactory::new(config, repo.clone());
        let mut registry = Registry::new();
        registry.register(Box::new(ListBuildpacks::new(repo))).unwrap();
        Runner::new(registry, factory)
    }

    /// Pre-record the plugin's side of the conversation. The protocol is
    /// strictly alternating, so a scripted stream is indistinguishable from
    /// a live plugin to the host loop.
    fn scripted_plugin(messages: &[PluginMessage]) -> Cursor<Vec<u8>> {
        let mut wire = Vec::new();
        for message in messages {
            write_message(&mut wire, message).unwrap();
        }
        Cursor::new(wire)
    }

    fn host_messages(wire: &[u8]) -> Vec<HostMessage> {
        let mut reader = Cursor::new(wire.to_vec());
        let mut messages = Vec::new();
        while let Ok(message) = read_message::<_, HostMessage>(&mut reader) {
            messages.push(message);
        }
        messages
    }

    #[test]
    fn nested_command_output_is_captured_into_the_reply() {
        let runner = test_runner(true);
        let mut from_plugin = scripted_plugin(&[
            PluginMessage::CliCommand { args: vec!["buildpacks".into()] },
            PluginMessage::Done { error: None },
        ]);
        let mut to_plugin = Vec::new();

        let argv = vec!["repeat".to_string(), "buildpacks".to_string()];
        let done = serve_invocation(&runner, &mut to_plugin, &mut from_plugin, &argv).unwrap();
        assert_eq!(done, None);

        let sent = host_messages(&to_plugin);
        assert_eq!(sent[0], HostMessage::Invoke { args: argv });
        match &sent[1] {
            HostMessage::CliResult { output, error } => {
                assert!(output.contains("go-buildpack"));
                assert_eq!(*error, None);
            }
            other => panic!("expected CliResult, got {:?}", other),
        }
    }

    #[test]
    fn nested_requirement_failure_is_a_value_not_a_crash() {
        let runner = test_runner(false);
        let mut from_plugin = scripted_plugin(&[
            PluginMessage::CliCommand { args: vec!["buildpacks".into()] },
            PluginMessage::Done { error: None },
        ]);
        let mut to_plugin = Vec::new();

        let argv = vec!["repeat".to_string()];
        serve_invocation(&runner, &mut to_plugin, &mut from_plugin, &argv).unwrap();

        match &host_messages(&to_plugin)[1] {
            HostMessage::CliResult { output, error } => {
                // Nothing was written before the login check failed.
                assert_eq!(output, "");
                assert!(error.as_deref().unwrap_or_default().contains("Not logged in"));
            }
            other => panic!("expected CliResult, got {:?}", other),
        }
    }

    #[test]
    fn nested_unknown_command_is_an_error_value() {
        let runner = test_runner(true);
        let mut from_plugin = scripted_plugin(&[
            PluginMessage::CliCommand { args: vec!["no-such".into()] },
            PluginMessage::Done { error: None },
        ]);
        let mut to_plugin = Vec::new();

        serve_invocation(&runner, &mut to_plugin, &mut from_plugin, &["x".to_string()]).unwrap();

        match &host_messages(&to_plugin)[1] {
            HostMessage::CliResult { error, .. } => {
                assert!(error.as_deref().unwrap_or_default().contains("no-such"));
            }
            other => panic!("expected CliResult, got {:?}", other),
        }
    }

    #[test]
    fn plugin_reported_failure_comes_back_from_done() {
        let runner = test_runner(true);
        let mut from_plugin =
            scripted_plugin(&[PluginMessage::Done { error: Some("plugin blew up".into()) }]);
        let mut to_plugin = Vec::new();

        let done =
            serve_invocation(&runner, &mut to_plugin, &mut from_plugin, &["x".to_string()])
                .unwrap();
        assert_eq!(done.as_deref(), Some("plugin blew up"));
    }

    #[test]
    fn truncated_session_reports_channel_closed() {
        let runner = test_runner(true);
        let mut from_plugin =
            scripted_plugin(&[PluginMessage::CliCommand { args: vec!["buildpacks".into()] }]);
        let mut to_plugin = Vec::new();

        let err = serve_invocation(&runner, &mut to_plugin, &mut from_plugin, &["x".to_string()])
            .unwrap_err();
        assert!(matches!(err, ProtocolError::ChannelClosed));
    }
}
