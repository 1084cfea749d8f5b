//! Canonical registry entities.
//!
//! Every field tolerates a wrong type or a `null` by falling back to its
//! default, so a payload that drifted from the expected schema still decodes.
//! Field names serialize in snake_case; the camelCase spellings used by newer
//! registry releases are accepted as aliases.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{serde_as, DefaultOnError, VecSkipError};

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Repository {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub url: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub source: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub id: String,
}

/// Version block of the legacy entity format
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionDetail {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub version: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, alias = "releaseDate", skip_serializing_if = "String::is_empty")]
    pub release_date: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, alias = "isLatest")]
    pub is_latest: bool,
}

/// A registry entry as returned by list endpoints
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Server {
    /// Registry id; recovered from registry metadata when the payload leaves it blank
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub id: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub name: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub description: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub repository: Repository,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(
        default,
        alias = "versionDetail",
        skip_serializing_if = "Option::is_none"
    )]
    pub version_detail: Option<VersionDetail>,
    /// Server-generated extension data, keyed by namespaced identifiers
    #[serde(rename = "_meta", skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub registry_meta: Option<Map<String, Value>>,
}

impl Server {
    /// Version string from whichever field the payload used
    pub fn display_version(&self) -> &str {
        match &self.version_detail {
            Some(detail) if self.version.is_empty() => &detail.version,
            _ => &self.version,
        }
    }

    pub fn release_date(&self) -> Option<&str> {
        self.version_detail
            .as_ref()
            .map(|d| d.release_date.as_str())
            .filter(|d| !d.is_empty())
    }
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentVariable {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub name: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, alias = "isRequired")]
    pub is_required: bool,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, alias = "isSecret")]
    pub is_secret: bool,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// An installable distribution of a server (npm, PyPI, OCI, ...)
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, alias = "registryType", alias = "registry_name")]
    pub registry_type: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, alias = "name")]
    pub identifier: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub version: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, alias = "runtimeHint", skip_serializing_if = "Option::is_none")]
    pub runtime_hint: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError<VecSkipError<_>>")]
    #[serde(
        default,
        alias = "environmentVariables",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub environment_variables: Vec<EnvironmentVariable>,
}

/// A hosted endpoint of a server
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Remote {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(
        default,
        rename = "type",
        alias = "transport_type",
        alias = "transportType"
    )]
    pub transport_type: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub url: String,
}

/// A registry entry with its packages and remotes
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ServerDetail {
    #[serde(flatten)]
    pub server: Server,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<Package>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remotes: Vec<Remote>,
}

impl From<Server> for ServerDetail {
    fn from(server: Server) -> Self {
        ServerDetail {
            server,
            ..Default::default()
        }
    }
}

/// Pagination block of list responses
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ListMetadata {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, alias = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// One page of a list endpoint
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Page<T> {
    pub servers: Vec<T>,
    pub metadata: ListMetadata,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default, alias = "githubClientId", skip_serializing_if = "Option::is_none")]
    pub github_client_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PublishResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrong_types_fall_back_to_defaults() {
        let server: Server = serde_json::from_value(json!({
            "id": 12345,
            "name": "io.test/server",
            "description": null,
            "repository": "not-an-object",
            "version_detail": {"version": "1.0.0", "is_latest": "yes"}
        }))
        .unwrap();

        assert_eq!(server.id, "");
        assert_eq!(server.name, "io.test/server");
        assert_eq!(server.description, "");
        assert_eq!(server.repository, Repository::default());
        let detail = server.version_detail.unwrap();
        assert_eq!(detail.version, "1.0.0");
        assert!(!detail.is_latest);
    }

    #[test]
    fn test_camel_case_aliases() {
        let server: Server = serde_json::from_value(json!({
            "name": "n",
            "versionDetail": {"version": "2.0.0", "releaseDate": "2024-01-01", "isLatest": true}
        }))
        .unwrap();
        assert_eq!(server.display_version(), "2.0.0");
        assert_eq!(server.release_date(), Some("2024-01-01"));
    }

    #[test]
    fn test_package_accepts_legacy_names() {
        let pkg: Package = serde_json::from_value(json!({
            "registry_name": "npm",
            "name": "@test/server",
            "version": "1.0.0",
            "environment_variables": [{"name": "API_KEY", "is_secret": true}, 42]
        }))
        .unwrap();
        assert_eq!(pkg.registry_type, "npm");
        assert_eq!(pkg.identifier, "@test/server");
        assert_eq!(pkg.environment_variables.len(), 1);
        assert!(pkg.environment_variables[0].is_secret);
    }

    #[test]
    fn test_detail_serializes_flat() {
        let detail = ServerDetail {
            server: Server {
                id: "abc".into(),
                name: "io.test/x".into(),
                version: "1.0.0".into(),
                ..Default::default()
            },
            packages: vec![],
            remotes: vec![Remote {
                transport_type: "sse".into(),
                url: "https://example.com/sse".into(),
            }],
        };
        let v = serde_json::to_value(&detail).unwrap();
        assert_eq!(v["id"], "abc");
        assert_eq!(v["remotes"][0]["type"], "sse");
        assert!(v.get("packages").is_none());
        assert!(v.get("_meta").is_none());
    }
}
