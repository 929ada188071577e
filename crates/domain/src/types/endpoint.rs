//! Endpoint descriptors for the five generated CRUD operations
//!
//! Every uploaded schema yields the same five REST routes. The set is fixed
//! at startup and never grows; consumers iterate [`Endpoint::ALL`] to build
//! per-operation views or log keys.

use serde::{Deserialize, Serialize};

use crate::constants::DATA_PATH_PREFIX;

/// One of the five operations generated for every resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// `POST /data/{name}`
    Create,
    /// `GET /data/{name}`
    List,
    /// `POST /data/{name}/search`
    Search,
    /// `PUT /data/{name}`
    Update,
    /// `DELETE /data/{name}/delete`
    Delete,
}

/// Static description of one generated endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EndpointDescriptor {
    /// Stable identifier, used as the call-log key.
    pub id: &'static str,
    /// Human-readable operation name.
    pub label: &'static str,
    /// HTTP method.
    pub method: &'static str,
    /// Path template with a `{name}` placeholder for the resource name.
    pub path_template: &'static str,
    /// Whether the operation sends a JSON request body.
    pub requires_body: bool,
}

impl Endpoint {
    /// All five endpoints, in display order.
    pub const ALL: [Self; 5] =
        [Self::Create, Self::List, Self::Search, Self::Update, Self::Delete];

    /// Stable identifier for this endpoint, used as the call-log key.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::List => "list",
            Self::Search => "search",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// HTTP method for this endpoint.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Create | Self::Search => "POST",
            Self::List => "GET",
            Self::Update => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether this endpoint sends a JSON request body.
    ///
    /// Note that delete carries its criteria in the body, not in query
    /// parameters, even though DELETE bodies are unusual.
    pub fn requires_body(&self) -> bool {
        !matches!(self, Self::List)
    }

    /// Static descriptor for this endpoint.
    pub fn descriptor(&self) -> EndpointDescriptor {
        let (label, path_template) = match self {
            Self::Create => ("Create record", "/data/{name}"),
            Self::List => ("List records", "/data/{name}"),
            Self::Search => ("Search records", "/data/{name}/search"),
            Self::Update => ("Update records", "/data/{name}"),
            Self::Delete => ("Delete records", "/data/{name}/delete"),
        };

        EndpointDescriptor {
            id: self.id(),
            label,
            method: self.method(),
            path_template,
            requires_body: self.requires_body(),
        }
    }

    /// Concrete request path for `resource`, with the name URL-encoded.
    pub fn path_for(&self, resource: &str) -> String {
        let encoded = urlencoding::encode(resource);
        match self {
            Self::Create | Self::List | Self::Update => {
                format!("{}/{}", DATA_PATH_PREFIX, encoded)
            }
            Self::Search => format!("{}/{}/search", DATA_PATH_PREFIX, encoded),
            Self::Delete => format!("{}/{}/delete", DATA_PATH_PREFIX, encoded),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_match_generated_routes() {
        let create = Endpoint::Create.descriptor();
        assert_eq!(create.method, "POST");
        assert_eq!(create.path_template, "/data/{name}");
        assert!(create.requires_body);

        let list = Endpoint::List.descriptor();
        assert_eq!(list.method, "GET");
        assert!(!list.requires_body);

        let delete = Endpoint::Delete.descriptor();
        assert_eq!(delete.method, "DELETE");
        assert_eq!(delete.path_template, "/data/{name}/delete");
        assert!(delete.requires_body);
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = Endpoint::ALL.iter().map(Endpoint::id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), Endpoint::ALL.len());
    }

    #[test]
    fn path_for_encodes_resource_names() {
        assert_eq!(Endpoint::List.path_for("orders"), "/data/orders");
        assert_eq!(Endpoint::Search.path_for("my orders"), "/data/my%20orders");
        assert_eq!(Endpoint::Delete.path_for("a/b"), "/data/a%2Fb/delete");
    }
}
