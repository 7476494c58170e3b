pub mod operation;
pub mod parameter;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The OpenAPI version every generated document declares.
pub const OPENAPI_VERSION: &str = "3.0.0";

/// Info object describing the API. The generator always emits all three
/// fields, defaulting `title` and `description` to empty strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub description: String,
    pub version: String,
}

/// A server URL definition, passed through from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, Value>,
}

/// A security requirement: map of scheme name → required scopes.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// Operations under one path, keyed by lowercased HTTP method. Stored as
/// `Value` so repeated merges at the same slot can combine structurally.
pub type PathItem = IndexMap<String, Value>;

/// Components object holding the resolved model schemas and any configured
/// security schemes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Value>,

    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub security_schemes: Option<IndexMap<String, Value>>,
}

/// The OpenAPI document assembled by the generator. Built incrementally:
/// phase 1 seeds `info` and `components`, phase 2 accumulates `paths`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,

    pub info: Info,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    #[serde(default)]
    pub components: Components,
}

impl Default for OpenApiDocument {
    fn default() -> Self {
        Self {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info::default(),
            servers: None,
            security: None,
            paths: IndexMap::new(),
            components: Components::default(),
        }
    }
}
