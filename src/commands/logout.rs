use crate::config::ClientConfig;
use anyhow::{Context, Result};

pub fn run(cfg: &ClientConfig) -> Result<()> {
    let store = cfg.credential_store();
    store
        .clear()
        .with_context(|| format!("failed to remove {}", store.path().display()))?;
    println!("Logged out");
    Ok(())
}
