//! Response envelopes shared by every FMC collection endpoint.
//!
//! Object bodies themselves are typed per resource in `fmc-core`; this module
//! only models what the transport layer needs to understand.

use serde::{Deserialize, Serialize};

// ── Pagination ───────────────────────────────────────────────────────

/// Collection page returned by `GET .../{collection}?offset=&limit=`.
///
/// FMC omits `items` entirely on an empty page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub paging: Paging,
}

impl<T> Page<T> {
    /// True when the server advertised a following page (`paging.next[0]`).
    pub fn has_next(&self) -> bool {
        self.paging.has_next()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub pages: u64,
    /// Links to the following page(s); absent on the last page.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next: Vec<String>,
}

impl Paging {
    pub fn has_next(&self) -> bool {
        !self.next.is_empty()
    }
}

// ── Minimal object reference ─────────────────────────────────────────

/// The fields every FMC object carries, enough to match by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedObject {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
}

// ── Server version ───────────────────────────────────────────────────

/// One entry of `GET /api/fmc_platform/v1/info/serverversion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerVersion {
    /// e.g. `"7.4.1 (build 172)"`.
    pub server_version: String,
    #[serde(default)]
    pub geo_version: Option<String>,
    #[serde(default)]
    pub vdb_version: Option<String>,
    #[serde(default)]
    pub sru_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ServerVersionList {
    #[serde(default)]
    pub items: Vec<ServerVersion>,
}

// ── Error body ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub messages: Vec<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorMessage {
    #[serde(default)]
    pub description: Option<String>,
}

impl ErrorResponse {
    pub(crate) fn message(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .error
            .messages
            .iter()
            .filter_map(|m| m.description.as_deref())
            .collect();
        (!parts.is_empty()).then(|| parts.join("; "))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_page_without_items() {
        let page: Page<NamedObject> = serde_json::from_value(json!({
            "links": { "self": "https://fmc/api/..." },
            "paging": { "offset": 0, "limit": 1000, "count": 0, "pages": 0 }
        }))
        .unwrap();
        assert!(page.items.is_empty());
        assert!(!page.has_next());
    }

    #[test]
    fn page_with_next_link() {
        let page: Page<NamedObject> = serde_json::from_value(json!({
            "items": [{ "id": "a1", "name": "web", "type": "Host" }],
            "paging": {
                "offset": 0, "limit": 1, "count": 2, "pages": 2,
                "next": ["https://fmc/api/fmc_config/v1/domain/x/object/hosts?offset=1&limit=1"]
            }
        }))
        .unwrap();
        assert_eq!(page.items[0].name, "web");
        assert_eq!(page.items[0].object_type.as_deref(), Some("Host"));
        assert!(page.has_next());
    }

    #[test]
    fn error_messages_are_joined() {
        let err: ErrorResponse = serde_json::from_value(json!({
            "error": {
                "category": "FRAMEWORK",
                "messages": [
                    { "description": "Duplicate name" },
                    { "description": "Object in use" }
                ],
                "severity": "ERROR"
            }
        }))
        .unwrap();
        assert_eq!(err.message().as_deref(), Some("Duplicate name; Object in use"));
    }
}
