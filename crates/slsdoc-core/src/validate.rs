use std::sync::OnceLock;

use jsonschema::{Draft, JSONSchema};
use serde::Serialize;
use serde_json::Value;

use crate::document::OpenApiDocument;

/// Structural meta-schema of the OpenAPI 3.0 object model, draft-4 like the
/// official one.
static META_SCHEMA_JSON: &str = include_str!("../assets/openapi-3.0-schema.json");

static META_SCHEMA: OnceLock<JSONSchema> = OnceLock::new();

fn meta_schema() -> &'static JSONSchema {
    META_SCHEMA.get_or_init(|| {
        let schema: Value = serde_json::from_str(META_SCHEMA_JSON)
            .expect("embedded OpenAPI 3.0 meta-schema is valid JSON");
        JSONSchema::options()
            .with_draft(Draft::Draft4)
            .compile(&schema)
            .expect("embedded OpenAPI 3.0 meta-schema compiles")
    })
}

/// One meta-schema violation, with the offending data path and the schema
/// path that rejected it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    #[serde(rename = "dataPath")]
    pub data_path: String,

    #[serde(rename = "schemaPath")]
    pub schema_path: String,

    pub message: String,
}

/// The outcome of validating a document. Returned as data, never thrown:
/// the caller decides whether a non-conformant document is still written
/// out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,

    pub context: Vec<String>,

    pub warnings: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Vec<ValidationIssue>>,
}

impl ValidationReport {
    fn passed() -> Self {
        Self {
            valid: true,
            context: Vec::new(),
            warnings: Vec::new(),
            error: None,
        }
    }

    fn failed(issues: Vec<ValidationIssue>) -> Self {
        Self {
            valid: false,
            context: issues.iter().map(|issue| issue.data_path.clone()).collect(),
            warnings: Vec::new(),
            error: Some(issues),
        }
    }
}

/// Validate an assembled document against the OpenAPI 3.0 meta-schema.
pub fn validate_document(document: &OpenApiDocument) -> ValidationReport {
    match serde_json::to_value(document) {
        Ok(instance) => validate_value(&instance),
        Err(error) => ValidationReport::failed(vec![ValidationIssue {
            data_path: String::new(),
            schema_path: String::new(),
            message: error.to_string(),
        }]),
    }
}

/// Validate an already-serialized document value.
pub fn validate_value(instance: &Value) -> ValidationReport {
    match meta_schema().validate(instance) {
        Ok(()) => ValidationReport::passed(),
        Err(errors) => {
            let issues = errors
                .map(|error| ValidationIssue {
                    data_path: error.instance_path.to_string(),
                    schema_path: error.schema_path.to_string(),
                    message: error.to_string(),
                })
                .collect();
            ValidationReport::failed(issues)
        }
    }
}
