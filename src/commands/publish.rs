use super::print_json;
use crate::config::ClientConfig;
use crate::model::ServerDetail;
use crate::normalize::decode_detail;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub async fn run(cfg: &ClientConfig, file: &Path, token: Option<&str>, json: bool) -> Result<()> {
    let (document, server) = read_server_document(file)?;

    let client = cfg.registry_client()?;
    let resp = client
        .publish(&document, token)
        .await
        .with_context(|| format!("failed to publish '{}'", server.server.name))?;

    if json {
        return print_json(&resp);
    }
    println!("=== Publish Server ({}) ===", file.display());
    println!("Success: {}", resp.message);
    println!("Server ID: {}", resp.id);
    Ok(())
}

/// Raw bytes of a server document plus its decoded form
pub(crate) fn read_server_document(file: &Path) -> Result<(Vec<u8>, ServerDetail)> {
    let document = fs::read(file)
        .with_context(|| format!("Failed to read server file: {}", file.display()))?;
    let text = std::str::from_utf8(&document)
        .with_context(|| format!("{} is not valid UTF-8", file.display()))?;
    let server = decode_detail(text)
        .with_context(|| format!("Invalid JSON in server file: {}", file.display()))?;
    if server.server.name.is_empty() {
        anyhow::bail!("server file {} has no name", file.display());
    }
    Ok((document, server))
}
