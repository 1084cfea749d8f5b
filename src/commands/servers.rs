use super::print_json;
use crate::config::ClientConfig;
use crate::model::Server;
use anyhow::Result;

pub async fn run(
    cfg: &ClientConfig,
    cursor: Option<&str>,
    limit: u32,
    json: bool,
    detailed: bool,
) -> Result<()> {
    let client = cfg.registry_client()?;

    if detailed {
        let page = client.list_servers_detailed(cursor, Some(limit)).await?;
        return print_json(&page);
    }

    let page = client.list_servers(cursor, Some(limit)).await?;
    if json {
        return print_json(&page);
    }

    println!("=== List Servers ===");
    println!("Total Servers: {}", page.servers.len());
    if let Some(next) = page.metadata.next_cursor.as_deref().filter(|c| !c.is_empty()) {
        println!("Next Cursor: {next}");
    }
    for (i, server) in page.servers.iter().enumerate() {
        println!("\n--- Server {} ---", i + 1);
        print_summary(server);
    }
    Ok(())
}

pub(crate) fn print_summary(server: &Server) {
    println!("ID: {}", server.id);
    println!("Name: {}", server.name);
    println!("Description: {}", server.description);
    if let Some(status) = server.status.as_deref().filter(|s| !s.is_empty()) {
        println!("Status: {status}");
    }
    if !server.repository.url.is_empty() {
        println!(
            "Repository: {} ({})",
            server.repository.url, server.repository.source
        );
    }
    println!("Version: {}", server.display_version());
    if let Some(date) = server.release_date() {
        println!("Release Date: {date}");
    }
}
