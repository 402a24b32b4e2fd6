#![forbid(unsafe_code)]

//! # nimbus
//!
//! Library backing the `nimbus` command-line client for the Nimbus cloud
//! platform control API.
//!
//! The crate is organized around a small dispatch pipeline:
//!
//! - [`command`]: the `Command` trait, per-command metadata, and flag parsing
//! - [`requirements`]: precondition checks run before a command body
//! - [`runner`]: the registry and the per-invocation execution pipeline
//! - [`plugin`]: the out-of-process plugin bridge (host and plugin sides)
//! - [`api`]: cloud controller repository interfaces and models
//!
//! Commands are registered once at startup and dispatched by name; plugin
//! binaries can contribute further command names and call back into the same
//! pipeline over a synchronous wire protocol.

pub mod api;
pub mod app;
pub mod command;
pub mod commands;
pub mod config;
pub mod errors;
pub mod plugin;
pub mod requirements;
pub mod runner;
pub mod terminal;

/// Invocation name of the tool, substituted for the `{tool}` placeholder in
/// command usage templates.
pub const NAME: &str = "nimbus";

/// Crate version reported by `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
