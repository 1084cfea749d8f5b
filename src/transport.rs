//! HTTP plumbing shared by every registry operation.
//!
//! [`AuthenticatedTransport`] resolves which token to send, issues the request
//! with a bounded timeout and, for mutating requests sent without any
//! credential, performs a single anonymous re-authentication and retry when
//! the registry answers with its "missing Authorization header" validation
//! error. Nothing else is ever retried.

use crate::auth::{AuthMethodId, AuthRegistry};
use crate::constants::{CLIENT_ID, REQUEST_TIMEOUT};
use crate::credentials::CredentialStore;
use crate::error::{Error, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
    Client, Method, StatusCode, Url,
};
use serde::Deserialize;
use tracing::{debug, info};

/// A request against the registry API, relative to the base URL
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Raw path segments; each one is percent-encoded when the URL is built
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    /// Token supplied on the command line; wins over the stored credential
    pub token: Option<String>,
}

impl ApiRequest {
    /// `route` is a fixed path such as `/v0/servers`; caller-supplied values
    /// are appended with [`ApiRequest::segment`]
    pub fn new(method: Method, route: &str) -> Self {
        ApiRequest {
            method,
            segments: route
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            query: Vec::new(),
            body: None,
            token: None,
        }
    }

    pub fn get(route: &str) -> Self {
        Self::new(Method::GET, route)
    }

    /// Append one path segment. `/`, `?`, `#` and `%` inside it are escaped,
    /// so a namespaced name like `io.example/server` stays a single segment.
    pub fn segment(mut self, value: impl Into<String>) -> Self {
        self.segments.push(value.into());
        self
    }

    /// Unencoded path, for logs
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn token(mut self, token: Option<&str>) -> Self {
        self.token = token.map(str::to_string);
        self
    }

    /// publish/update/delete; only these are eligible for the auth fallback
    pub fn is_mutating(&self) -> bool {
        !matches!(self.method, Method::GET | Method::HEAD | Method::OPTIONS)
    }
}

/// Status and raw body of a registry response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Deserialize)]
struct ValidationProblem {
    #[serde(default)]
    errors: Vec<ProblemDetail>,
}

#[derive(Deserialize)]
struct ProblemDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    location: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Turn a non-success status into [`Error::Api`] carrying the raw body
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Api {
                status: self.status.as_u16(),
                body: self.body,
            })
        }
    }

    /// The registry's 422 validation error for an absent `Authorization` header.
    /// An error entry counts when its location is `header.Authorization`, or
    /// when its message reports something missing and names a header or
    /// authorization:
    ///
    /// ```json
    /// {"status":422,"detail":"validation failed",
    ///  "errors":[{"message":"required header parameter is missing","location":"header.Authorization"}]}
    /// ```
    pub fn is_missing_authorization(&self) -> bool {
        if self.status != StatusCode::UNPROCESSABLE_ENTITY {
            return false;
        }
        let Ok(problem) = serde_json::from_str::<ValidationProblem>(&self.body) else {
            return false;
        };
        problem.errors.iter().any(|e| {
            let message = e.message.to_ascii_lowercase();
            e.location.eq_ignore_ascii_case("header.Authorization")
                || (message.contains("missing")
                    && (message.contains("header") || message.contains("authorization")))
        })
    }
}

pub struct AuthenticatedTransport {
    base_url: String,
    client: Client,
    auth: AuthRegistry,
}

impl AuthenticatedTransport {
    /// Transport against `base_url` using the default authentication methods
    pub fn new(base_url: &str, store: CredentialStore) -> Result<Self> {
        let client = build_client()?;
        let auth = AuthRegistry::with_defaults(client.clone(), base_url, store);
        Ok(Self::with_auth(base_url, client, auth))
    }

    pub fn with_auth(base_url: &str, client: Client, auth: AuthRegistry) -> Self {
        AuthenticatedTransport {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            auth,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthRegistry {
        &self.auth
    }

    /// Explicit token if non-empty, otherwise the stored credential's token
    /// (empty when none is stored or it has expired)
    pub fn resolve_token(&self, explicit: Option<&str>) -> Result<String> {
        match explicit {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Ok(self.auth.store().load()?.token),
        }
    }

    /// Execute `req`, applying the one-shot anonymous auth fallback to
    /// mutating requests. Any HTTP status is returned as a response; only
    /// network failures, credential I/O and authentication failures are errors.
    pub async fn request(&self, req: &ApiRequest) -> Result<ApiResponse> {
        let token = self.resolve_token(req.token.as_deref())?;
        let resp = self.send(req, &token).await?;

        if req.is_mutating() && token.is_empty() && resp.is_missing_authorization() {
            info!(
                path = %req.path(),
                "no valid credential; authenticating anonymously and retrying once"
            );
            let credential = self.auth.login(AuthMethodId::Anonymous).await?;
            return self.send(req, &credential.token).await;
        }

        Ok(resp)
    }

    async fn send(&self, req: &ApiRequest, token: &str) -> Result<ApiResponse> {
        let url = self.url_for(req)?;
        let mut builder = self.client.request(req.method.clone(), url);

        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(body) = &req.body {
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body.clone());
        }
        if !token.is_empty() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| Error::Auth("token contains invalid header characters".into()))?;
            builder = builder.header(AUTHORIZATION, value);
        }

        debug!(
            method = %req.method,
            path = %req.path(),
            authenticated = !token.is_empty(),
            "sending request"
        );
        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        debug!(
            method = %req.method,
            path = %req.path(),
            status = status.as_u16(),
            "received response"
        );

        Ok(ApiResponse { status, body })
    }

    /// Base URL with the request's segments appended, each percent-encoded
    pub fn url_for(&self, req: &ApiRequest) -> Result<Url> {
        let base_url = &self.base_url;
        let mut url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid base URL '{base_url}': {e}")))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("base URL '{base_url}' cannot carry a path")))?
            .pop_if_empty()
            .extend(&req.segments);
        Ok(url)
    }
}

/// HTTP client with the fixed client identifier and request timeout
pub fn build_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_ID));
    Ok(Client::builder()
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        }
    }

    const MISSING_AUTH: &str = r#"{"title":"Unprocessable Entity","status":422,"detail":"validation failed","errors":[{"message":"required header parameter is missing","location":"header.Authorization","value":""}]}"#;

    #[test]
    fn test_recognizes_missing_authorization() {
        assert!(response(422, MISSING_AUTH).is_missing_authorization());
    }

    #[test]
    fn test_other_failures_are_not_missing_authorization() {
        assert!(!response(401, MISSING_AUTH).is_missing_authorization());
        let invalid_name = r#"{"errors":[{"message":"name is required","location":"body.name"}]}"#;
        assert!(!response(422, invalid_name).is_missing_authorization());
        assert!(!response(422, "not json").is_missing_authorization());
        let unauthorized = r#"{"error": "missing authorization header"}"#;
        assert!(!response(401, unauthorized).is_missing_authorization());
    }

    #[test]
    fn test_missing_header_message_without_location() {
        let body = r#"{"errors":[{"message":"required header parameter is missing"}]}"#;
        assert!(response(422, body).is_missing_authorization());

        let body = r#"{"errors":[{"message":"Missing Authorization"}]}"#;
        assert!(response(422, body).is_missing_authorization());
    }

    #[test]
    fn test_error_for_status_keeps_raw_body() {
        let err = response(404, "server not found").error_for_status().unwrap_err();
        assert!(
            matches!(err, Error::Api { status: 404, ref body } if body == "server not found")
        );
        assert!(response(201, "{}").error_for_status().is_ok());
    }

    #[test]
    fn test_mutating_methods() {
        assert!(!ApiRequest::get("/v0/servers").is_mutating());
        assert!(ApiRequest::new(Method::POST, "/v0/publish").is_mutating());
        assert!(ApiRequest::new(Method::PUT, "/v0/servers/x").is_mutating());
        assert!(ApiRequest::new(Method::DELETE, "/v0/servers/x").is_mutating());
    }

    fn transport(base_url: &str) -> AuthenticatedTransport {
        AuthenticatedTransport::new(base_url, CredentialStore::new("unused.json")).unwrap()
    }

    #[test]
    fn test_segments_are_percent_encoded() {
        let t = transport("http://localhost:8080");

        let req = ApiRequest::get("/v0/servers")
            .segment("io.github.user/server")
            .segment("versions")
            .segment("1.0.0");
        assert_eq!(
            t.url_for(&req).unwrap().as_str(),
            "http://localhost:8080/v0/servers/io.github.user%2Fserver/versions/1.0.0"
        );
        assert_eq!(req.path(), "/v0/servers/io.github.user/server/versions/1.0.0");

        let url = t.url_for(&ApiRequest::get("/v0/servers").segment("x?limit=1#frag")).unwrap();
        assert_eq!(url.path(), "/v0/servers/x%3Flimit=1%23frag");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_base_url_path_prefix_is_kept() {
        let t = transport("https://registry.example.com/api/");
        let url = t.url_for(&ApiRequest::get("/v0/health")).unwrap();
        assert_eq!(url.as_str(), "https://registry.example.com/api/v0/health");
    }
}
