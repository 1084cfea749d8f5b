use super::{AuthMethodId, AuthenticationMethod};
use crate::constants::{CLIENT_ID, DEFAULT_TOKEN_TTL_SECS};
use crate::credentials::Credential;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::debug;

/// Unauthenticated token issuance (`POST /v0/auth/none`)
pub struct Anonymous {
    client: reqwest::Client,
    url: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default, alias = "token")]
    registry_token: String,
    #[serde(default)]
    expires_at: Option<i64>,
}

impl Anonymous {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Anonymous {
            client,
            url: format!("{}/v0/auth/none", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl AuthenticationMethod for Anonymous {
    fn id(&self) -> AuthMethodId {
        AuthMethodId::Anonymous
    }

    async fn authenticate(&self) -> Result<Credential> {
        debug!(url = %self.url, "requesting anonymous token");
        let resp = self
            .client
            .post(&self.url)
            .header(USER_AGENT, CLIENT_ID)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(Error::Auth(format!(
                "anonymous token request returned HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        if token.registry_token.is_empty() {
            return Err(Error::Auth(format!(
                "anonymous token response did not include a token: {body}"
            )));
        }

        let expires_at = match token.expires_at {
            Some(ts) if ts > 0 => ts,
            _ => chrono::Utc::now().timestamp() + DEFAULT_TOKEN_TTL_SECS,
        };
        Ok(Credential::new(
            AuthMethodId::Anonymous,
            token.registry_token,
            expires_at,
        ))
    }
}
