use crate::config::ClientConfig;
use crate::error::Result;
use crate::model::{HealthResponse, Page, PublishResponse, Server, ServerDetail};
use crate::normalize::{decode_detail, decode_list};
use crate::transport::{ApiRequest, ApiResponse, AuthenticatedTransport};
use reqwest::Method;
use serde_json::json;
use tracing::warn;

/// Typed operations against the registry's `/v0` API
pub struct RegistryClient {
    transport: AuthenticatedTransport,
}

impl RegistryClient {
    pub fn new(cfg: &ClientConfig) -> Result<Self> {
        let transport = AuthenticatedTransport::new(&cfg.base_url, cfg.credential_store())?;
        Ok(RegistryClient { transport })
    }

    pub fn from_transport(transport: AuthenticatedTransport) -> Self {
        RegistryClient { transport }
    }

    pub fn transport(&self) -> &AuthenticatedTransport {
        &self.transport
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self
            .transport
            .request(&ApiRequest::get("/v0/health"))
            .await?
            .error_for_status()?;
        Ok(serde_json::from_str(&resp.body)?)
    }

    /// One page of servers, normalized to the canonical model
    pub async fn list_servers(
        &self,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Page<Server>> {
        let mut req = ApiRequest::get("/v0/servers");
        if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
            req = req.query("cursor", cursor);
        }
        if let Some(limit) = limit.filter(|l| *l > 0) {
            req = req.query("limit", limit);
        }
        let resp = self.transport.request(&req).await?.error_for_status()?;
        decode_list(&resp.body)
    }

    /// One page of servers with packages and remotes.
    ///
    /// Issues one detail request per listed server, sequentially. A server
    /// whose detail cannot be fetched keeps its list-level summary.
    pub async fn list_servers_detailed(
        &self,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Page<ServerDetail>> {
        let page = self.list_servers(cursor, limit).await?;
        let mut servers = Vec::with_capacity(page.servers.len());

        for summary in page.servers {
            if summary.id.is_empty() {
                warn!(name = %summary.name, "server has no id; skipping detail fetch");
                servers.push(ServerDetail::from(summary));
                continue;
            }
            match self.get_server(&summary.id).await {
                Ok(mut detail) => {
                    if detail.server.id.is_empty() {
                        detail.server.id = summary.id.clone();
                    }
                    servers.push(detail);
                }
                Err(e) => {
                    warn!(id = %summary.id, error = %e, "detail fetch failed; using list summary");
                    servers.push(ServerDetail::from(summary));
                }
            }
        }

        Ok(Page {
            servers,
            metadata: page.metadata,
        })
    }

    /// `GET /v0/servers/{id}`
    pub async fn get_server(&self, id: &str) -> Result<ServerDetail> {
        let req = ApiRequest::get("/v0/servers").segment(id);
        let resp = self.transport.request(&req).await?.error_for_status()?;
        decode_detail(&resp.body)
    }

    /// `GET /v0/servers/{name}/versions/{version}`
    pub async fn get_server_version(&self, name: &str, version: &str) -> Result<ServerDetail> {
        let req = ApiRequest::get("/v0/servers")
            .segment(name)
            .segment("versions")
            .segment(version);
        let resp = self.transport.request(&req).await?.error_for_status()?;
        decode_detail(&resp.body)
    }

    /// `POST /v0/publish` with a server document
    pub async fn publish(&self, document: &[u8], token: Option<&str>) -> Result<PublishResponse> {
        let req = ApiRequest::new(Method::POST, "/v0/publish")
            .body(document)
            .token(token);
        let resp = self.transport.request(&req).await?.error_for_status()?;
        Ok(serde_json::from_str(&resp.body)?)
    }

    /// `PUT /v0/servers/{id}` with a replacement server document
    pub async fn update_server(
        &self,
        id: &str,
        document: &[u8],
        token: Option<&str>,
    ) -> Result<ApiResponse> {
        let req = ApiRequest::new(Method::PUT, "/v0/servers")
            .segment(id)
            .body(document)
            .token(token);
        self.transport.request(&req).await?.error_for_status()
    }

    /// Soft delete: mark `name@version` with status `deleted`
    pub async fn delete_server_version(
        &self,
        name: &str,
        version: &str,
        token: Option<&str>,
    ) -> Result<ApiResponse> {
        let body = serde_json::to_vec(&json!({ "status": "deleted" }))?;
        let req = ApiRequest::new(Method::PUT, "/v0/servers")
            .segment(name)
            .segment("versions")
            .segment(version)
            .body(body)
            .token(token);
        self.transport.request(&req).await?.error_for_status()
    }

    /// `DELETE /v0/servers/{id}` on registries that still support hard deletes
    pub async fn delete_server(&self, id: &str, token: Option<&str>) -> Result<ApiResponse> {
        let req = ApiRequest::new(Method::DELETE, "/v0/servers")
            .segment(id)
            .token(token);
        self.transport.request(&req).await?.error_for_status()
    }
}
