use crate::config::ClientConfig;
use anyhow::{Context, Result};

#[derive(Debug)]
pub enum Target {
    /// Soft delete of one version
    Version { name: String, version: String },
    /// Hard delete by registry id
    Id(String),
}

pub async fn run(
    cfg: &ClientConfig,
    target: Target,
    token: Option<&str>,
    json: bool,
) -> Result<()> {
    let client = cfg.registry_client()?;

    let (label, resp) = match &target {
        Target::Version { name, version } => (
            format!("{name}@{version}"),
            client.delete_server_version(name, version, token).await,
        ),
        Target::Id(id) => (id.clone(), client.delete_server(id, token).await),
    };
    let resp = resp.with_context(|| format!("failed to delete {label}"))?;

    if json {
        println!("{}", resp.body);
    } else {
        println!("=== Delete Server Version ({label}) ===");
        println!("Status Code: {}", resp.status.as_u16());
        println!("{}", resp.body);
    }
    Ok(())
}
