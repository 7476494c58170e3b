use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::SecurityRequirement;
use super::parameter::Parameter;

/// A `$ref` pointer into the document's schema components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRef {
    #[serde(rename = "$ref")]
    pub ref_path: String,
}

impl SchemaRef {
    /// Pointer to a named entry in `components/schemas`.
    pub fn schema(name: &str) -> Self {
        Self {
            ref_path: format!("#/components/schemas/{name}"),
        }
    }
}

/// Content for one media type: a schema reference plus any examples carried
/// over from the model registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaContent {
    pub schema: SchemaRef,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Value>>,
}

impl MediaContent {
    pub fn for_model(name: &str) -> Self {
        Self {
            schema: SchemaRef::schema(name),
            example: None,
            examples: None,
        }
    }
}

/// A request body derived from `requestModels`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaContent>,
}

/// A response header: description always present, schema optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

/// A response derived from one `methodResponses` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,

    pub content: IndexMap<String, MediaContent>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, Header>>,
}

/// One HTTP method on one path. Owned exclusively by the path entry that
/// contains it.
///
/// Optional passthrough fields are omitted from the serialized operation
/// when the documentation block does not set them; `parameters` and
/// `responses` are always emitted, empty or not.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId")]
    pub operation_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(default)]
    pub responses: IndexMap<String, Response>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
}
