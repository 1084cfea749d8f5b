use crate::config::ClientConfig;
use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};

pub async fn run(cfg: &ClientConfig, method: &str, domain: Option<&str>) -> Result<()> {
    let client = cfg.registry_client()?;
    let auth = client.transport().auth();

    let id = auth.resolve(method)?.id();
    let credential = auth
        .login(id)
        .await
        .with_context(|| match domain {
            Some(domain) => format!("login with '{method}' for {domain} failed"),
            None => format!("login with '{method}' failed"),
        })?;

    println!("Logged in with method '{id}'");
    match Utc.timestamp_opt(credential.expires_at, 0).single() {
        Some(at) if credential.expires_at > 0 => println!("Token expires at {}", at.to_rfc3339()),
        _ => println!("Token does not expire"),
    }
    println!("Credential saved to {}", auth.store().path().display());
    Ok(())
}
