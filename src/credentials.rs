//! Durable storage for the current registry credential.
//!
//! Exactly one credential exists per user. It lives in a small JSON file
//! (`~/.mcpx-cli-config.json` by default) readable only by its owner:
//!
//! ```json
//! {
//!   "method": "anonymous",
//!   "token": "eyJhbGciOi...",
//!   "expires_at": 1735689600
//! }
//! ```
//!
//! A missing file means "not authenticated" and is not an error. A credential
//! whose expiry falls inside the buffer window loads as the zero value, but the
//! file is left in place; only [`CredentialStore::clear`] removes it.

use crate::auth::AuthMethodId;
use crate::constants::EXPIRY_BUFFER_SECS;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The locally persisted credential authorizing registry requests
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
    /// Authentication method that minted the token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<AuthMethodId>,
    #[serde(default)]
    pub token: String,
    /// Namespace domain for DNS/HTTP based methods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Unix timestamp in seconds; `0` means the token never expires
    #[serde(default)]
    pub expires_at: i64,
}

impl Credential {
    pub fn new(method: AuthMethodId, token: impl Into<String>, expires_at: i64) -> Self {
        Credential {
            method: Some(method),
            token: token.into(),
            domain: None,
            expires_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.token.is_empty()
    }

    /// A credential is usable iff it declares no expiry or `now` is still at
    /// least [`EXPIRY_BUFFER_SECS`] before the declared expiry.
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.expires_at == 0 || now <= self.expires_at.saturating_sub(EXPIRY_BUFFER_SECS)
    }
}

/// File-backed store for the single user credential
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CredentialStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `credential`, replacing any previous one.
    ///
    /// The content is written to a sibling temporary file created with mode
    /// `0600` and then renamed over the target, so an interrupted write never
    /// clobbers a previously valid credential.
    pub fn save(&self, credential: &Credential) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("mcpx-cli-config.json");
        let temp_path = parent.join(format!(".{}.tmp-{}", file_name, std::process::id()));

        let data = serde_json::to_vec_pretty(credential).map_err(|e| Error::io(&self.path, e))?;
        if let Err(err) = write_private(&temp_path, &data) {
            let _ = fs::remove_file(&temp_path);
            return Err(Error::io(&temp_path, err));
        }
        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            Error::io(&self.path, e)
        })?;

        debug!(path = %self.path.display(), "saved credential");
        Ok(())
    }

    /// Load the credential, judging expiry against the current clock
    pub fn load(&self) -> Result<Credential> {
        self.load_at(chrono::Utc::now().timestamp())
    }

    /// Load the credential, judging expiry against `now` (unix seconds)
    pub fn load_at(&self, now: i64) -> Result<Credential> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no credential file");
                return Ok(Credential::default());
            }
            Err(e) => return Err(Error::io(&self.path, e)),
        };

        let credential: Credential =
            serde_json::from_str(&data).map_err(|e| Error::io(&self.path, e))?;

        if !credential.is_valid_at(now) {
            debug!(
                expires_at = credential.expires_at,
                "stored credential is expired or about to expire"
            );
            return Ok(Credential::default());
        }
        Ok(credential)
    }

    /// Remove the credential file. An already absent file is not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "removed credential file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }
}

fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;

    // mode() only applies on creation; a stale temp file keeps its old bits
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(data)?;
    file.sync_all()
}
