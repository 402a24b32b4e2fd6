//! Parsed invocation arguments.
//!
//! Each command's flag set is declared as data ([`FlagSpec`]) and bridged to
//! a dynamically built `clap` command at parse time. The result keeps an
//! explicit is-set bit per flag: some commands change behavior only when a
//! flag was supplied, which "present with default value" cannot express.

use std::collections::{HashMap, HashSet};

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, Command as ClapCommand};

use crate::command::{CommandMetadata, FlagKind};

/// Positional arguments plus typed flag values for one invocation.
#[derive(Debug, Default)]
pub struct ParsedInvocation {
    positionals: Vec<String>,
    bools: HashMap<String, bool>,
    ints: HashMap<String, i64>,
    strings: HashMap<String, String>,
    explicitly_set: HashSet<String>,
}

impl ParsedInvocation {
    /// Parse command-line tokens against a command's declared flag set.
    /// Returns the parser's message on malformed input.
    pub fn parse(meta: &CommandMetadata, tokens: &[String]) -> Result<Self, String> {
        if meta.skip_flag_parsing {
            return Ok(Self::from_positionals(tokens));
        }

        let matches = build_parser(meta)
            .try_get_matches_from(tokens.iter().map(String::as_str))
            .map_err(|e| e.to_string())?;

        let mut parsed = ParsedInvocation {
            positionals: matches
                .get_many::<String>("args")
                .map(|v| v.cloned().collect())
                .unwrap_or_default(),
            ..Default::default()
        };

        for spec in &meta.flags {
            match spec.kind {
                FlagKind::Bool => {
                    parsed.bools.insert(spec.key.clone(), matches.get_flag(&spec.key));
                }
                FlagKind::Int => {
                    if let Some(value) = matches.get_one::<i64>(&spec.key) {
                        parsed.ints.insert(spec.key.clone(), *value);
                    }
                }
                FlagKind::Str => {
                    if let Some(value) = matches.get_one::<String>(&spec.key) {
                        parsed.strings.insert(spec.key.clone(), value.clone());
                    }
                }
            }
            if matches.value_source(&spec.key) == Some(ValueSource::CommandLine) {
                parsed.explicitly_set.insert(spec.key.clone());
            }
        }

        Ok(parsed)
    }

    /// Every token as a positional; used when a command skips flag parsing.
    pub fn from_positionals(tokens: &[String]) -> Self {
        ParsedInvocation { positionals: tokens.to_vec(), ..Default::default() }
    }

    pub fn args(&self) -> &[String] {
        &self.positionals
    }

    /// Whether the flag appeared on the command line, as opposed to holding
    /// its default value.
    pub fn is_set(&self, key: &str) -> bool {
        self.explicitly_set.contains(key)
    }

    pub fn bool_flag(&self, key: &str) -> bool {
        self.bools.get(key).copied().unwrap_or(false)
    }

    pub fn int_flag(&self, key: &str) -> Option<i64> {
        self.ints.get(key).copied()
    }

    pub fn string_flag(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }
}

fn build_parser(meta: &CommandMetadata) -> ClapCommand {
    let mut parser = ClapCommand::new(meta.name.clone())
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .override_usage(meta.rendered_usage());

    for spec in &meta.flags {
        let mut arg = Arg::new(spec.key.clone()).help(spec.description.clone());
        // Single-character keys become short flags, as in `-i 3`.
        arg = if spec.key.len() == 1 {
            arg.short(spec.key.chars().next().unwrap_or_default())
        } else {
            arg.long(spec.key.clone())
        };
        arg = match spec.kind {
            FlagKind::Bool => arg.action(ArgAction::SetTrue),
            FlagKind::Int => arg.action(ArgAction::Set).value_parser(clap::value_parser!(i64)),
            FlagKind::Str => arg.action(ArgAction::Set),
        };
        parser = parser.arg(arg);
    }

    parser.arg(Arg::new("args").num_args(0..).value_name("ARGS"))
}
