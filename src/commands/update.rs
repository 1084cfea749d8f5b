use super::publish::read_server_document;
use crate::config::ClientConfig;
use anyhow::{Context, Result};
use std::path::Path;

pub async fn run(
    cfg: &ClientConfig,
    id: &str,
    file: &Path,
    token: Option<&str>,
    json: bool,
) -> Result<()> {
    let (document, _) = read_server_document(file)?;

    let client = cfg.registry_client()?;
    let resp = client
        .update_server(id, &document, token)
        .await
        .with_context(|| format!("failed to update server {id}"))?;

    if json {
        println!("{}", resp.body);
    } else {
        println!("=== Update Server ({id}) ===");
        println!("Status Code: {}", resp.status.as_u16());
        println!("{}", resp.body);
    }
    Ok(())
}
