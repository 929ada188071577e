//! Schema document types
//!
//! The backend owns schema documents; the client only ever reads them. The
//! shapes here cover the JSON Schema subset the platform emits: an object
//! schema with typed, optionally described and enumerated properties.
//! Deserialization is deliberately lenient: uploaded schemas vary and a
//! missing `type` or `required` must not fail a page load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A resource schema as served by `GET /apis/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Top-level JSON Schema type, usually `"object"`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    /// Property name to property description, in stable order.
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySpec>,

    /// Names of required properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// One property of a [`SchemaDocument`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    /// Declared JSON Schema type (`"string"`, `"number"`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,

    /// Human-readable description, if the author provided one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Closed set of allowed values, if the property is an enum.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<Value>>,
}

impl SchemaDocument {
    /// Whether `name` appears in this schema's required list.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}
