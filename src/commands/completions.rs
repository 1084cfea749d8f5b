use crate::Cli;
use anyhow::{bail, Result};
use clap::CommandFactory;
use clap_complete::{
    generate,
    shells::{Bash, Fish, Zsh},
};
use std::io;

pub fn run(shell: &str) -> Result<()> {
    let mut cmd = Cli::command();
    match shell {
        "bash" => generate(Bash, &mut cmd, "mcpx-cli", &mut io::stdout()),
        "zsh" => generate(Zsh, &mut cmd, "mcpx-cli", &mut io::stdout()),
        "fish" => generate(Fish, &mut cmd, "mcpx-cli", &mut io::stdout()),
        other => bail!("unsupported shell '{}', choose: bash, zsh, fish", other),
    }
    Ok(())
}
