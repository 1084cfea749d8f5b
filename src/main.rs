//! # mcpx CLI
//!
//! Command-line client for the mcpx server registry API.
//!
//! ## Quick Start
//!
//! ```bash
//! # Check the registry is up
//! mcpx-cli --base-url https://registry.example.com health
//!
//! # Browse
//! mcpx-cli servers --limit 10
//! mcpx-cli servers --json --detailed
//! mcpx-cli server <id> --json
//!
//! # Publish (authenticates anonymously if no credential is stored)
//! mcpx-cli publish server.json
//! mcpx-cli delete io.example/server 1.0.0
//! ```
//!
//! The credential lives in `~/.mcpx-cli-config.json` (owner-only permissions);
//! `mcpx-cli logout` removes it.

use anyhow::Result;
use clap::Parser;
use mcpx_cli::{commands, config::ClientConfig, logging, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let cmd = cli.cmd.unwrap_or_else(|| {
        eprintln!("No command provided. Use --help to see available commands.");
        std::process::exit(1);
    });
    if let commands::Commands::Completions { shell } = &cmd {
        return commands::completions::run(shell);
    }
    let cfg = ClientConfig::resolve(cli.base_url.as_deref(), cli.config)?;
    commands::run(cmd, cfg).await
}
