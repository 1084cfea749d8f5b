//! Reconciles the registry's historical response formats into [`crate::model`].
//!
//! Two entity shapes are in the wild:
//!
//! * **wrapper**: `{"server": {...}, "x-io.modelcontextprotocol.registry": {...}}`,
//!   where the registry's own bookkeeping (ids, timestamps) sits beside the entity;
//! * **legacy**: entity fields at the top level, with bookkeeping under `_meta`.
//!
//! Each element is matched against the shapes in order. Every attempt yields a
//! partial entity; partials are merged without ever replacing a populated field
//! with an empty one. A blank id is then recovered from the registry metadata.
//! Anything that is valid JSON decodes; only syntactically invalid input is an
//! error.

use crate::constants::REGISTRY_META_NAMESPACE;
use crate::error::Result;
use crate::model::{ListMetadata, Package, Page, Remote, Server, ServerDetail};
use serde::Deserialize;
use serde_json::{Map, Value};
use serde_with::{serde_as, DefaultOnError, VecSkipError};
use tracing::{debug, warn};

type Object = Map<String, Value>;

/// Keys under which registry metadata has been observed, in lookup order
const META_KEYS: [&str; 5] = [
    "_meta",
    "x-io.modelcontextprotocol.registry",
    "registry_meta",
    "registryMeta",
    "meta",
];

/// Id-like keys inside a metadata object, most specific first
const ID_KEYS: [&str; 5] = ["serverId", "server_id", "id", "versionId", "version_id"];

/// Result of matching one JSON element against the known entity shapes
#[derive(Debug)]
pub enum Shape<'a> {
    Wrapper {
        server: &'a Object,
        meta: Option<&'a Object>,
    },
    Legacy {
        entity: &'a Object,
        meta: Option<&'a Object>,
    },
    Unrecognized,
}

impl<'a> Shape<'a> {
    /// Candidate shapes for `value`, in the order they should be tried
    pub fn candidates(value: &'a Value) -> Vec<Shape<'a>> {
        let Some(obj) = value.as_object() else {
            return vec![Shape::Unrecognized];
        };

        let mut shapes = Vec::with_capacity(2);
        if let Some(server) = obj.get("server").and_then(Value::as_object) {
            shapes.push(Shape::Wrapper {
                server,
                meta: find_meta(obj),
            });
        }
        shapes.push(Shape::Legacy {
            entity: obj,
            meta: find_meta(obj),
        });
        shapes
    }

    fn decode(&self) -> Partial {
        match self {
            Shape::Wrapper { server, meta } => {
                // Newer payloads also nest _meta inside the entity itself
                let meta = (*meta).or_else(|| find_meta(server));
                Partial::from_object(server, meta)
            }
            Shape::Legacy { entity, meta } => Partial::from_object(entity, *meta),
            Shape::Unrecognized => Partial::default(),
        }
    }
}

/// Packages and remotes, decoded separately from the entity fields
#[serde_as]
#[derive(Deserialize, Default)]
struct DetailParts {
    #[serde_as(deserialize_as = "DefaultOnError<VecSkipError<_>>")]
    #[serde(default)]
    packages: Vec<Package>,
    #[serde_as(deserialize_as = "DefaultOnError<VecSkipError<_>>")]
    #[serde(default)]
    remotes: Vec<Remote>,
}

#[derive(Default)]
struct Partial {
    server: Server,
    parts: DetailParts,
}

impl Partial {
    fn from_object(obj: &Object, meta: Option<&Object>) -> Self {
        let value = Value::Object(obj.clone());
        let mut server: Server = serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            warn!(error = %e, "entity did not match the expected schema; keeping defaults");
            Server::default()
        });
        server.registry_meta = meta.cloned();
        let parts = serde_json::from_value(value).unwrap_or_default();
        Partial { server, parts }
    }

    /// Fill every empty field of `self` from `other`
    fn merge(mut self, other: Partial) -> Partial {
        let s = &mut self.server;
        let o = other.server;
        fill(&mut s.id, o.id);
        fill(&mut s.name, o.name);
        fill(&mut s.description, o.description);
        fill(&mut s.version, o.version);
        fill(&mut s.repository.url, o.repository.url);
        fill(&mut s.repository.source, o.repository.source);
        fill(&mut s.repository.id, o.repository.id);
        if s.status.as_deref().map_or(true, str::is_empty) && o.status.is_some() {
            s.status = o.status;
        }
        if s.version_detail.is_none() {
            s.version_detail = o.version_detail;
        }
        if s.registry_meta.is_none() {
            s.registry_meta = o.registry_meta;
        }
        if self.parts.packages.is_empty() {
            self.parts.packages = other.parts.packages;
        }
        if self.parts.remotes.is_empty() {
            self.parts.remotes = other.parts.remotes;
        }
        self
    }
}

fn fill(slot: &mut String, candidate: String) {
    if slot.is_empty() && !candidate.is_empty() {
        *slot = candidate;
    }
}

fn find_meta(obj: &Object) -> Option<&Object> {
    META_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_object))
}

/// Find an id in registry metadata.
///
/// Namespaced objects (`io.modelcontextprotocol.registry/...`) are searched
/// first, then the metadata map itself. Only non-empty strings count.
pub fn recover_id(meta: &Object) -> Option<String> {
    let namespaced = meta
        .iter()
        .filter(|(key, _)| key.starts_with(REGISTRY_META_NAMESPACE))
        .filter_map(|(_, value)| value.as_object());

    namespaced
        .chain(std::iter::once(meta))
        .find_map(|obj| {
            ID_KEYS.iter().find_map(|key| {
                obj.get(*key)
                    .and_then(Value::as_str)
                    .filter(|id| !id.is_empty())
            })
        })
        .map(str::to_string)
}

fn normalize_value(value: &Value) -> (Server, DetailParts) {
    let mut partial: Option<Partial> = None;

    for shape in Shape::candidates(value) {
        let decoded = shape.decode();
        let accepted = match &shape {
            Shape::Wrapper { meta, .. } => !decoded.server.id.is_empty() || meta.is_some(),
            _ => true,
        };
        partial = Some(match partial {
            Some(prev) => prev.merge(decoded),
            None => decoded,
        });
        if accepted {
            break;
        }
    }

    let Partial { mut server, parts } = partial.unwrap_or_default();

    if server.version.is_empty() {
        if let Some(detail) = &server.version_detail {
            server.version = detail.version.clone();
        }
    }

    if server.id.is_empty() {
        if let Some(id) = server.registry_meta.as_ref().and_then(recover_id) {
            debug!(name = %server.name, id = %id, "recovered id from registry metadata");
            server.id = id;
        }
    }

    (server, parts)
}

/// Normalize a single already-parsed entity
pub fn normalize_server(value: &Value) -> Server {
    normalize_value(value).0
}

/// Normalize a single already-parsed entity, keeping packages and remotes
pub fn normalize_server_detail(value: &Value) -> ServerDetail {
    let (server, parts) = normalize_value(value);
    ServerDetail {
        server,
        packages: parts.packages,
        remotes: parts.remotes,
    }
}

/// Decode a detail response body
pub fn decode_detail(body: &str) -> Result<ServerDetail> {
    let value: Value = serde_json::from_str(body)?;
    Ok(normalize_server_detail(&value))
}

/// Decode a list response body: `{"servers": [...], "metadata": {...}}`.
/// A bare array of entities is accepted as well.
pub fn decode_list(body: &str) -> Result<Page<Server>> {
    let value: Value = serde_json::from_str(body)?;

    let (items, metadata) = match &value {
        Value::Array(items) => (items.as_slice(), ListMetadata::default()),
        Value::Object(obj) => {
            let items = obj
                .get("servers")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let metadata = obj
                .get("metadata")
                .cloned()
                .and_then(|m| serde_json::from_value::<ListMetadata>(m).ok())
                .unwrap_or_default();
            (items, metadata)
        }
        _ => {
            warn!("list response is neither an object nor an array");
            (&[][..], ListMetadata::default())
        }
    };

    Ok(Page {
        servers: items.iter().map(normalize_server).collect(),
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    const SERVER_ID: &str = "58031f85-792f-4c22-9d76-b4dd01e287aa";

    #[test]
    fn test_wrapper_shape_recovers_id_from_sibling_meta() {
        let body = json!({
            "servers": [{
                "server": {
                    "name": "io.test/server1",
                    "description": "Test server 1",
                    "repository": {"url": "https://github.com/test/server1", "source": "github"},
                    "version_detail": {"version": "1.0.0", "is_latest": true}
                },
                "x-io.modelcontextprotocol.registry": {
                    "id": SERVER_ID,
                    "published_at": "2023-01-01T00:00:00Z",
                    "is_latest": true
                }
            }],
            "metadata": {"next_cursor": "abc", "count": 1}
        })
        .to_string();

        let page = decode_list(&body).unwrap();
        assert_eq!(page.servers.len(), 1);
        let server = &page.servers[0];
        assert_eq!(server.id, SERVER_ID);
        assert_eq!(server.name, "io.test/server1");
        assert_eq!(server.version, "1.0.0");
        assert!(server.registry_meta.is_some());
        assert_eq!(page.metadata.next_cursor.as_deref(), Some("abc"));
        assert_eq!(page.metadata.count, Some(1));
        assert_eq!(page.metadata.total, None);
    }

    #[test]
    fn test_legacy_shape_recovers_id_from_namespaced_meta() {
        let body = json!({
            "servers": [{
                "name": "io.test/server1",
                "version": "1.0.0",
                "_meta": {
                    "io.modelcontextprotocol.registry/official": {
                        "serverId": SERVER_ID,
                        "versionId": format!("{SERVER_ID}-v1"),
                        "isLatest": true
                    }
                }
            }]
        })
        .to_string();

        let page = decode_list(&body).unwrap();
        assert_eq!(page.servers[0].id, SERVER_ID);
        assert_eq!(page.servers[0].version, "1.0.0");
    }

    #[test]
    fn test_populated_id_is_never_overwritten() {
        let body = json!({
            "servers": [{
                "id": "top-level-id",
                "name": "io.test/server1",
                "_meta": {
                    "io.modelcontextprotocol.registry/official": {"serverId": SERVER_ID}
                }
            }]
        })
        .to_string();

        assert_eq!(decode_list(&body).unwrap().servers[0].id, "top-level-id");
    }

    #[test]
    fn test_version_id_used_when_server_id_absent() {
        let meta = json!({
            "io.modelcontextprotocol.registry/official": {"versionId": "v-123"}
        });
        assert_eq!(recover_id(meta.as_object().unwrap()).as_deref(), Some("v-123"));
    }

    #[test]
    fn test_blank_server_id_falls_through_to_version_id() {
        let meta = json!({
            "io.modelcontextprotocol.registry/official": {"serverId": "", "versionId": "v-1"}
        });
        assert_eq!(recover_id(meta.as_object().unwrap()).as_deref(), Some("v-1"));

        let meta = json!({"server_id": "", "id": "", "version_id": "v-2"});
        assert_eq!(recover_id(meta.as_object().unwrap()).as_deref(), Some("v-2"));

        let server = normalize_server(&json!({
            "id": "",
            "name": "io.test/blank",
            "_meta": {
                "io.modelcontextprotocol.registry/official": {"serverId": "", "versionId": "v-3"}
            }
        }));
        assert_eq!(server.id, "v-3");
    }

    #[test]
    fn test_non_string_meta_id_is_ignored() {
        let meta = json!({"id": 12345, "published_at": "2023-01-01T00:00:00Z"});
        assert_eq!(recover_id(meta.as_object().unwrap()), None);

        let meta = json!({"published_at": "2023-01-01T00:00:00Z"});
        assert_eq!(recover_id(meta.as_object().unwrap()), None);
    }

    #[test]
    fn test_missing_id_everywhere_stays_blank() {
        let server = normalize_server(&json!({"name": "io.test/nameless"}));
        assert_eq!(server.id, "");
        assert_eq!(server.name, "io.test/nameless");
    }

    #[test]
    fn test_wrapper_without_id_or_meta_merges_with_top_level() {
        let server = normalize_server(&json!({
            "server": {"name": "inner-name"},
            "id": "outer-id",
            "description": "outer description"
        }));
        assert_eq!(server.name, "inner-name");
        assert_eq!(server.id, "outer-id");
        assert_eq!(server.description, "outer description");
    }

    #[test]
    fn test_wrapper_uses_meta_nested_in_entity() {
        let server = normalize_server(&json!({
            "server": {
                "name": "io.test/nested",
                "_meta": {
                    "io.modelcontextprotocol.registry/official": {"serverId": SERVER_ID}
                }
            }
        }));
        assert_eq!(server.id, SERVER_ID);
    }

    #[test]
    fn test_detail_keeps_packages_and_remotes() {
        let body = json!({
            "server": {
                "id": "abc",
                "name": "io.test/server",
                "packages": [{"identifier": "@test/server", "version": "1.0.0", "registry_type": "npm"}],
                "remotes": [{"type": "stdio"}]
            },
            "_meta": {"io.modelcontextprotocol.registry/official": {"serverId": "other"}}
        })
        .to_string();

        let detail = decode_detail(&body).unwrap();
        assert_eq!(detail.server.id, "abc");
        assert_eq!(detail.packages.len(), 1);
        assert_eq!(detail.packages[0].registry_type, "npm");
        assert_eq!(detail.remotes[0].transport_type, "stdio");
    }

    #[test]
    fn test_unexpected_shapes_degrade_instead_of_failing() {
        let body = r#"{"servers": [42, "x", {"name": 7}], "metadata": "bogus"}"#;
        let page = decode_list(body).unwrap();
        assert_eq!(page.servers.len(), 3);
        assert!(page.servers.iter().all(|s| s.id.is_empty() && s.name.is_empty()));
        assert_eq!(page.metadata, ListMetadata::default());

        assert!(decode_list(r#"{"unrelated": true}"#).unwrap().servers.is_empty());
        assert!(decode_list("null").unwrap().servers.is_empty());
        assert_eq!(decode_list(r#"[{"id": "a"}]"#).unwrap().servers[0].id, "a");
    }

    #[test]
    fn test_malformed_json_is_a_decode_error() {
        assert!(matches!(decode_list("{servers: ["), Err(Error::Decode(_))));
        assert!(matches!(decode_detail("<html>"), Err(Error::Decode(_))));
    }

    #[test]
    fn test_camel_case_pagination() {
        let body = r#"{"servers": [], "metadata": {"nextCursor": "n", "total": 9}}"#;
        let page = decode_list(body).unwrap();
        assert_eq!(page.metadata.next_cursor.as_deref(), Some("n"));
        assert_eq!(page.metadata.total, Some(9));
    }
}
