use crate::config::ClientConfig;
use crate::constants::DEFAULT_PAGE_LIMIT;
use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

pub mod completions;
pub mod delete;
pub mod health;
pub mod login;
pub mod logout;
pub mod publish;
pub mod server;
pub mod servers;
pub mod update;

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Check api health status")]
    Health,
    #[command(about = "List servers (one page)")]
    Servers {
        /// Pagination cursor from a previous page
        #[arg(long)]
        cursor: Option<String>,
        /// Maximum number of servers to return
        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: u32,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
        /// Include packages and remotes (one extra request per server; requires --json)
        #[arg(long, requires = "json")]
        detailed: bool,
    },
    #[command(about = "Get server details by id, or by name with --version")]
    Server {
        /// Server id, or server name when --version is given
        id: String,
        #[arg(long)]
        version: Option<String>,
        #[arg(long)]
        json: bool,
    },
    #[command(about = "Publish a server to the registry")]
    Publish {
        /// Server document (JSON)
        file: PathBuf,
        /// Authentication token (overrides the stored credential)
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        json: bool,
    },
    #[command(about = "Replace an existing server entry")]
    Update {
        id: String,
        /// Server document (JSON)
        file: PathBuf,
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        json: bool,
    },
    #[command(about = "Delete a server version (soft delete), or a server by --id")]
    Delete {
        /// Server name
        #[arg(required_unless_present = "id", requires = "version")]
        name: Option<String>,
        /// Server version
        version: Option<String>,
        /// Hard-delete by server id instead
        #[arg(long, conflicts_with = "name")]
        id: Option<String>,
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        json: bool,
    },
    #[command(about = "Authenticate and store the credential")]
    Login {
        /// anonymous, github-oauth, github-oidc, dns or http
        #[arg(long, default_value = "anonymous")]
        method: String,
        /// Namespace domain to prove ownership of. Required by the dns and http
        /// methods; only reported in their error until those methods are implemented
        /// and fill `Credential.domain`.
        #[arg(long, required_if_eq_any([("method", "dns"), ("method", "http")]))]
        domain: Option<String>,
    },
    #[command(about = "Remove the stored credential")]
    Logout,
    #[command(about = "Emit shell completion scripts (bash/zsh/fish)")]
    Completions { shell: String },
}

pub async fn run(cmd: Commands, cfg: ClientConfig) -> Result<()> {
    match cmd {
        Commands::Health => health::run(&cfg).await,
        Commands::Servers {
            cursor,
            limit,
            json,
            detailed,
        } => servers::run(&cfg, cursor.as_deref(), limit, json, detailed).await,
        Commands::Server { id, version, json } => {
            server::run(&cfg, &id, version.as_deref(), json).await
        }
        Commands::Publish { file, token, json } => {
            publish::run(&cfg, &file, token.as_deref(), json).await
        }
        Commands::Update {
            id,
            file,
            token,
            json,
        } => update::run(&cfg, &id, &file, token.as_deref(), json).await,
        Commands::Delete {
            name,
            version,
            id,
            token,
            json,
        } => {
            let target = match (id, name, version) {
                (Some(id), _, _) => delete::Target::Id(id),
                (None, Some(name), Some(version)) => delete::Target::Version { name, version },
                _ => anyhow::bail!("either <name> <version> or --id is required"),
            };
            delete::run(&cfg, target, token.as_deref(), json).await
        }
        Commands::Login { method, domain } => login::run(&cfg, &method, domain.as_deref()).await,
        Commands::Logout => logout::run(&cfg),
        Commands::Completions { shell } => completions::run(&shell),
    }
}

/// Print `value` as indented JSON on stdout
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
