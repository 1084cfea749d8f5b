use crate::config::ClientConfig;
use anyhow::{Context, Result};

pub async fn run(cfg: &ClientConfig) -> Result<()> {
    println!("=== Health Check ===");
    let client = cfg.registry_client()?;
    let health = client
        .health()
        .await
        .with_context(|| format!("health check against {} failed", cfg.base_url))?;

    println!("Status: {}", health.status);
    if let Some(id) = health.github_client_id.filter(|id| !id.is_empty()) {
        println!("GitHub Client ID: {id}");
    }
    Ok(())
}
