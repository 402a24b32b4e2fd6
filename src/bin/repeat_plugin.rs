#![forbid(unsafe_code)]

//! Demo plugin: repeat one host command across a list of targets.
//!
//! `nimbus repeat CMD [t1,t2,...] ARGS...` runs `CMD <target> ARGS...` once
//! per target through the host's own command pipeline. Per-target failures
//! are printed and the loop continues; there is no atomic multi-target
//! operation, each target is independent. `--dryrun` prints what would run
//! without running it.
//!
//! The wire protocol owns stdout, so everything user-facing goes to stderr.

use std::process::exit;

use nimbus::plugin::client::{serve, CliConnection, NimbusPlugin};
use nimbus::plugin::{PluginCommand, PluginMetadata};

struct RepeatPlugin;

const HELP: &str = "\
nimbus repeat CMD TARGETS ARGS...

OPTIONAL PARAMS:
   --help    display this text
   --dryrun  print the commands that would run without running them

REQUIRED PARAMS:
   CMD     command to repeat (e.g. delete-buildpack)
   TARGETS comma-separated list without spaces (e.g. [go-bp,ruby-bp])
   ARGS    additional arguments appended to every run

EXAMPLE:
   nimbus repeat delete-buildpack [go-bp,ruby-bp] -f";

impl NimbusPlugin for RepeatPlugin {
    fn metadata(&self) -> PluginMetadata {
        PluginMetadata {
            name: "Repeat".into(),
            commands: vec![PluginCommand {
                name: "repeat".into(),
                help_text: "Repeat a command for a list of targets. Use --help for details."
                    .into(),
            }],
        }
    }

    fn run(&self, connection: &mut CliConnection<'_>, args: &[String]) -> anyhow::Result<()> {
        // args[0] is the claimed command name, "repeat".
        let mut dryrun = false;
        let mut rest: Vec<&str> = Vec::new();
        for arg in &args[1..] {
            match arg.as_str() {
                "--help" => {
                    eprintln!("{}", HELP);
                    return Ok(());
                }
                "--dryrun" => dryrun = true,
                other => rest.push(other),
            }
        }

        let [cmd, targets, extra @ ..] = rest.as_slice() else {
            eprintln!("{}", HELP);
            anyhow::bail!("repeat needs a command and a target list");
        };

        let targets = targets.trim_start_matches('[').trim_end_matches(']');

        for target in targets.split(',').filter(|t| !t.is_empty()) {
            let mut nested: Vec<&str> = vec![*cmd, target];
            nested.extend_from_slice(extra);

            if dryrun {
                eprintln!("repeat would run \"nimbus {}\"", nested.join(" "));
                continue;
            }

            eprintln!("Running \"nimbus {}\"...", nested.join(" "));
            // Failures are per-target; keep going regardless.
            match connection.cli_command(&nested) {
                Ok(output) => eprintln!("{}", output),
                Err(e) => eprintln!("error from nested command: {}", e),
            }
        }
        Ok(())
    }
}

fn main() {
    if let Err(e) = serve(&RepeatPlugin) {
        eprintln!("repeat plugin failed: {:#}", e);
        exit(1);
    }
}
