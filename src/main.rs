#![forbid(unsafe_code)]

//! `nimbus` binary entry point.
//!
//! Handles the global surface (version, help), builds the runner, and
//! dispatches the invocation. An unknown command name falls through to the
//! installed plugins before being reported as unknown. Quiet failures print
//! their message and exit non-zero; only unexpected internal errors get the
//! crash diagnostic block.

use std::path::Path;
use std::process::exit;
use std::rc::Rc;

use console::style;
use tracing_subscriber::EnvFilter;

use nimbus::app;
use nimbus::config::CoreConfig;
use nimbus::errors::{CommandError, RunError};
use nimbus::plugin::config::InstalledPlugins;
use nimbus::plugin::host;
use nimbus::runner::Runner;
use nimbus::terminal::TerminalUi;
use nimbus::{NAME, VERSION};

fn main() {
    let filter =
        EnvFilter::try_from_env("NIMBUS_TRACE").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    exit(run(&argv));
}

fn run(argv: &[String]) -> i32 {
    match argv.first().map(String::as_str) {
        None | Some("-h") | Some("--help") => print_app_help(),
        Some("-v") | Some("--version") => {
            println!("{} version {}", NAME, VERSION);
            0
        }
        Some("help") => match argv.get(1) {
            Some(topic) => print_command_help(topic),
            None => print_app_help(),
        },
        Some(_) => dispatch(argv),
    }
}

fn build_runner() -> Result<Runner, i32> {
    let config = match CoreConfig::load() {
        Ok(config) => Rc::new(config),
        Err(e) => {
            crash_diagnostic(&e);
            return Err(1);
        }
    };
    app::build_runner(config, InstalledPlugins::home_dir()).map_err(|e| {
        crash_diagnostic(&e);
        1
    })
}

fn load_plugins() -> Result<InstalledPlugins, i32> {
    InstalledPlugins::load(&InstalledPlugins::home_dir()).map_err(|e| {
        crash_diagnostic(&e);
        1
    })
}

fn print_app_help() -> i32 {
    let (runner, plugins) = match (build_runner(), load_plugins()) {
        (Ok(runner), Ok(plugins)) => (runner, plugins),
        _ => return 1,
    };
    match app::render_app_help(&runner, &plugins) {
        Ok(help) => {
            println!("{}", help);
            0
        }
        Err(e) => {
            crash_diagnostic(&e);
            1
        }
    }
}

fn print_command_help(topic: &str) -> i32 {
    let (runner, plugins) = match (build_runner(), load_plugins()) {
        (Ok(runner), Ok(plugins)) => (runner, plugins),
        _ => return 1,
    };
    match app::render_command_help(&runner, &plugins, topic) {
        Some(help) => {
            println!("{}", help);
            0
        }
        None => {
            eprintln!("{}", app::unknown_command_message(topic));
            1
        }
    }
}

fn dispatch(argv: &[String]) -> i32 {
    let runner = match build_runner() {
        Ok(runner) => runner,
        Err(code) => return code,
    };

    let mut ui = TerminalUi::new();
    match runner.run_by_name(argv, &mut ui) {
        Ok(()) => 0,
        Err(RunError::UnknownCommand { name }) => delegate_to_plugin(&runner, &name, argv),
        Err(RunError::Command(error)) => report_command_error(error),
    }
}

fn delegate_to_plugin(runner: &Runner, name: &str, argv: &[String]) -> i32 {
    let plugins = match load_plugins() {
        Ok(plugins) => plugins,
        Err(code) => return code,
    };

    let Some((plugin, _)) = plugins.find_command(name) else {
        // Quiet, expected failure: nothing claims this name.
        eprintln!("{}", app::unknown_command_message(name));
        return 1;
    };

    run_plugin(runner, &plugin.location, argv)
}

fn run_plugin(runner: &Runner, binary: &Path, argv: &[String]) -> i32 {
    match host::run_plugin_command(runner, binary, argv) {
        Ok(None) => 0,
        Ok(Some(message)) => {
            eprintln!("{}", style("FAILED").red());
            eprintln!("{}", message);
            1
        }
        Err(e) => {
            crash_diagnostic(&e);
            1
        }
    }
}

fn report_command_error(error: CommandError) -> i32 {
    match error {
        CommandError::Internal(inner) => crash_diagnostic(&inner),
        quiet => {
            eprintln!("{}", style("FAILED").red());
            eprintln!("{}", quiet);
        }
    }
    1
}

fn crash_diagnostic(error: &anyhow::Error) {
    eprintln!("{}", style("Something unexpected happened. This is a bug in nimbus.").red());
    eprintln!();
    eprintln!("{:#}", error);
    eprintln!();
    eprintln!("Please file this bug: https://github.com/nimbus-platform/nimbus-cli/issues");
}
