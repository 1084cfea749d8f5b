use super::{print_json, servers::print_summary};
use crate::config::ClientConfig;
use crate::model::ServerDetail;
use anyhow::Result;

pub async fn run(cfg: &ClientConfig, id: &str, version: Option<&str>, json: bool) -> Result<()> {
    let client = cfg.registry_client()?;
    let detail = match version {
        Some(version) => client.get_server_version(id, version).await?,
        None => client.get_server(id).await?,
    };

    if json {
        return print_json(&detail);
    }
    println!("=== Server Details ({id}) ===");
    print_detail(&detail);
    Ok(())
}

fn print_detail(detail: &ServerDetail) {
    print_summary(&detail.server);

    if !detail.packages.is_empty() {
        println!("\nPackages:");
        for (i, pkg) in detail.packages.iter().enumerate() {
            println!("  Package {}:", i + 1);
            println!("    Registry: {}", pkg.registry_type);
            println!("    Identifier: {}", pkg.identifier);
            println!("    Version: {}", pkg.version);
            if let Some(hint) = &pkg.runtime_hint {
                println!("    Runtime Hint: {hint}");
            }
            if !pkg.environment_variables.is_empty() {
                println!("    Environment Variables:");
                for env in &pkg.environment_variables {
                    println!("      - {}: {}", env.name, env.description);
                }
            }
        }
    }

    if !detail.remotes.is_empty() {
        println!("\nRemotes:");
        for (i, remote) in detail.remotes.iter().enumerate() {
            println!("  Remote {}:", i + 1);
            println!("    Transport: {}", remote.transport_type);
            if !remote.url.is_empty() {
                println!("    URL: {}", remote.url);
            }
        }
    }
}
