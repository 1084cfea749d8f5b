//! Pluggable authentication methods.
//!
//! Every method mints a fresh [`Credential`]; the [`AuthRegistry`] dispatches by
//! method id and persists whatever the method returns. Only `anonymous` talks
//! to the registry directly. The interactive methods (GitHub device flow, OIDC,
//! DNS and HTTP challenges) are registered as [`external::Unsupported`] and
//! fail with a clear error instead of pretending to succeed.

use crate::credentials::{Credential, CredentialStore};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::info;

pub mod anonymous;
pub mod external;

pub use anonymous::Anonymous;

/// Identifier of an authentication method, as stored in the credential file
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMethodId {
    Anonymous,
    GithubOauth,
    GithubOidc,
    Dns,
    Http,
}

impl AuthMethodId {
    pub const ALL: [AuthMethodId; 5] = [
        AuthMethodId::Anonymous,
        AuthMethodId::GithubOauth,
        AuthMethodId::GithubOidc,
        AuthMethodId::Dns,
        AuthMethodId::Http,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AuthMethodId::Anonymous => "anonymous",
            AuthMethodId::GithubOauth => "github-oauth",
            AuthMethodId::GithubOidc => "github-oidc",
            AuthMethodId::Dns => "dns",
            AuthMethodId::Http => "http",
        }
    }
}

impl fmt::Display for AuthMethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMethodId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AuthMethodId::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::UnknownAuthMethod(s.to_string()))
    }
}

/// A strategy that produces a fresh credential
#[async_trait]
pub trait AuthenticationMethod: Send + Sync {
    fn id(&self) -> AuthMethodId;

    async fn authenticate(&self) -> Result<Credential>;
}

/// Dispatches authentication by method id and persists the result
pub struct AuthRegistry {
    methods: HashMap<AuthMethodId, Box<dyn AuthenticationMethod>>,
    store: CredentialStore,
}

impl AuthRegistry {
    /// An empty registry; methods are added with [`AuthRegistry::register`]
    pub fn new(store: CredentialStore) -> Self {
        AuthRegistry {
            methods: HashMap::new(),
            store,
        }
    }

    /// Registry with `anonymous` against `base_url` and every other method
    /// registered as unsupported
    pub fn with_defaults(client: reqwest::Client, base_url: &str, store: CredentialStore) -> Self {
        let mut registry = AuthRegistry::new(store);
        registry.register(Box::new(Anonymous::new(client, base_url)));
        for id in AuthMethodId::ALL {
            if id != AuthMethodId::Anonymous {
                registry.register(Box::new(external::Unsupported::new(id)));
            }
        }
        registry
    }

    pub fn register(&mut self, method: Box<dyn AuthenticationMethod>) {
        self.methods.insert(method.id(), method);
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Look up a method by its textual id. Unknown ids fail immediately.
    pub fn resolve(&self, name: &str) -> Result<&dyn AuthenticationMethod> {
        let id = name.parse::<AuthMethodId>()?;
        self.get(id)
    }

    fn get(&self, id: AuthMethodId) -> Result<&dyn AuthenticationMethod> {
        self.methods
            .get(&id)
            .map(|m| m.as_ref())
            .ok_or_else(|| Error::AuthNotSupported(id.to_string()))
    }

    /// Run method `id`, persist the credential it returns and hand it back
    pub async fn login(&self, id: AuthMethodId) -> Result<Credential> {
        let credential = self.get(id)?.authenticate().await?;
        if credential.is_empty() {
            return Err(Error::Auth(format!("method '{id}' returned an empty token")));
        }
        self.store.save(&credential)?;
        info!(method = %id, expires_at = credential.expires_at, "stored new credential");
        Ok(credential)
    }

    /// Remove the stored credential
    pub fn logout(&self) -> Result<()> {
        self.store.clear()
    }
}
