//! Client configuration.
//!
//! Settings come from command-line flags first, then environment variables,
//! then built-in defaults:
//!
//! | setting         | flag         | environment         | default                        |
//! |-----------------|--------------|---------------------|--------------------------------|
//! | registry URL    | `--base-url` | `MCPX_BASE_URL`     | `http://localhost:8080`        |
//! | credential file | `--config`   | `MCPX_CONFIG_PATH`  | `~/.mcpx-cli-config.json`      |

use crate::constants::{CONFIG_PATH_ENV, CREDENTIAL_FILE, DEFAULT_BASE_URL};
use crate::credentials::CredentialStore;
use crate::error::{Error, Result};
use crate::registry::RegistryClient;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Registry base URL without a trailing slash
    pub base_url: String,
    pub credential_path: PathBuf,
}

impl ClientConfig {
    pub fn new(base_url: &str, credential_path: PathBuf) -> Self {
        ClientConfig {
            base_url: normalize_base_url(base_url),
            credential_path,
        }
    }

    /// Resolve configuration from optional overrides, falling back to the
    /// environment and defaults
    pub fn resolve(base_url: Option<&str>, credential_path: Option<PathBuf>) -> Result<Self> {
        let base_url = base_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(DEFAULT_BASE_URL);
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "base URL '{base_url}' must start with http:// or https://"
            )));
        }
        let credential_path = match credential_path {
            Some(path) => path,
            None => default_credential_path()?,
        };
        Ok(Self::new(base_url, credential_path))
    }

    pub fn credential_store(&self) -> CredentialStore {
        CredentialStore::new(self.credential_path.clone())
    }

    pub fn registry_client(&self) -> Result<RegistryClient> {
        RegistryClient::new(self)
    }
}

/// `MCPX_CONFIG_PATH` if set, else `<home>/.mcpx-cli-config.json`
pub fn default_credential_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    let mut p = dirs::home_dir()
        .ok_or_else(|| Error::Config("cannot determine the home directory".into()))?;
    p.push(CREDENTIAL_FILE);
    Ok(p)
}

pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
