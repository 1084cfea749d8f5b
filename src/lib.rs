//! # mcpx CLI Library
//!
//! Client-side building blocks for the mcpx server registry:
//!
//! - [`credentials`] - the single file-backed credential and its expiry policy
//! - [`auth`] - pluggable authentication methods (anonymous token issuance)
//! - [`transport`] - authenticated HTTP with the one-shot anonymous auth fallback
//! - [`normalize`] - reconciles the registry's wrapper and legacy response shapes
//! - [`registry`] - typed operations (list, get, publish, update, delete)

use clap::Parser;
use std::path::PathBuf;

pub mod auth;
pub mod commands;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod registry;
pub mod transport;

pub use error::{Error, Result};

/// Command-line client for the mcpx server registry API
///
/// Browse, publish, update and delete registry entries. Mutating commands
/// authenticate anonymously on demand when no credential is stored.
#[derive(Parser)]
#[command(
    name = "mcpx-cli",
    version,
    about = "A command-line client for the mcpx registry api",
    long_about = "A command-line client for the mcpx server registry api.\n\nLists and inspects registry entries, and publishes, updates or deletes them using a stored\ncredential (see `login`) or an explicit --token. Output is text by default or JSON with --json."
)]
pub struct Cli {
    /// Base url of the mcpx api
    #[arg(long, global = true, env = "MCPX_BASE_URL")]
    pub base_url: Option<String>,

    /// Credential file (default: ~/.mcpx-cli-config.json)
    #[arg(long, global = true, env = "MCPX_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Log requests and authentication decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Option<commands::Commands>,
}
