//! Shared constants for the mcpx CLI

use std::time::Duration;

/// Registry used when neither `--base-url` nor `MCPX_BASE_URL` is given
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Credential file name, placed in the user's home directory
pub const CREDENTIAL_FILE: &str = ".mcpx-cli-config.json";

/// Overrides the credential file location
pub const CONFIG_PATH_ENV: &str = "MCPX_CONFIG_PATH";

pub const BASE_URL_ENV: &str = "MCPX_BASE_URL";

pub const LOG_ENV: &str = "MCPX_LOG";

/// Value of the `User-Agent` header sent with every request
pub const CLIENT_ID: &str = concat!("mcpx-cli/", env!("CARGO_PKG_VERSION"));

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Seconds subtracted from a credential's expiry before it is considered stale
pub const EXPIRY_BUFFER_SECS: i64 = 60;

/// Lifetime assumed for an anonymous token when the server omits `expires_at`
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Prefix of the namespaced metadata keys the registry attaches to entities
pub const REGISTRY_META_NAMESPACE: &str = "io.modelcontextprotocol.registry";

pub const DEFAULT_PAGE_LIMIT: u32 = 30;
