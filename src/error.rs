//! Error types for the registry client library.
//!
//! Command handlers wrap these in `anyhow` with extra context; the library itself
//! keeps the taxonomy explicit so callers can branch on it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The credential file exists but could not be read, written or parsed
    #[error("credential file {path}: {message}")]
    Io { path: String, message: String },

    /// The server sent something that is not JSON
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("unknown authentication method '{0}' (expected one of: anonymous, github-oauth, github-oidc, dns, http)")]
    UnknownAuthMethod(String),

    #[error("authentication method '{0}' is not supported by this client")]
    AuthNotSupported(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status; `body` is the raw server payload
    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Error::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    /// HTTP status attached to the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_carries_status_and_body() {
        let err = Error::Api {
            status: 422,
            body: r#"{"detail":"validation failed"}"#.to_string(),
        };
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), r#"HTTP 422: {"detail":"validation failed"}"#);
    }

    #[test]
    fn test_non_http_errors_have_no_status() {
        assert_eq!(Error::Auth("nope".into()).status(), None);
        assert_eq!(Error::UnknownAuthMethod("x".into()).status(), None);
    }
}
