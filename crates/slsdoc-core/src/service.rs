use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::DocumentationConfig;
use crate::error::ConfigError;

/// A function authorizer: either a bare function name or a configuration
/// block carrying one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Authorizer {
    Name(String),
    Config { name: String },
}

impl Authorizer {
    pub fn name(&self) -> &str {
        match self {
            Authorizer::Name(name) => name,
            Authorizer::Config { name } => name,
        }
    }
}

/// One declared parameter inside a documentation block. Every field beyond
/// `name` is optional so derivation can distinguish "absent" from "set to a
/// falsy value" (`allowReserved: false` is still copied through).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamConfig {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: Option<bool>,

    #[serde(default)]
    pub schema: Option<Value>,

    #[serde(default)]
    pub deprecated: Option<bool>,

    #[serde(default)]
    pub allow_empty_value: Option<bool>,

    #[serde(default)]
    pub allow_reserved: Option<bool>,

    #[serde(default)]
    pub style: Option<String>,

    #[serde(default)]
    pub explode: Option<bool>,

    #[serde(default)]
    pub example: Option<Value>,

    #[serde(default)]
    pub examples: Option<Vec<Value>>,

    #[serde(default)]
    pub content: Option<Value>,
}

/// The request body doc block. Carries only a description; the content is
/// driven by `requestModels`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBodyDoc {
    #[serde(default)]
    pub description: Option<String>,
}

/// The response body doc block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseBodyDoc {
    #[serde(default)]
    pub description: Option<String>,
}

/// A declared response header.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseHeader {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub schema: Option<Value>,
}

/// One declared method response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodResponse {
    #[serde(deserialize_with = "status_code_string")]
    pub status_code: String,

    #[serde(default)]
    pub response_models: IndexMap<String, String>,

    #[serde(default)]
    pub response_body: Option<ResponseBodyDoc>,

    #[serde(default)]
    pub response_headers: Option<Vec<ResponseHeader>>,
}

/// Status codes appear as YAML numbers or strings; responses are keyed by
/// the string form either way.
fn status_code_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(code) => code.to_string(),
        Raw::Text(code) => code,
    })
}

/// The documentation block of one HTTP event: the route's doc block that
/// drives operation synthesis.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Documentation {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub deprecated: Option<bool>,
    pub path_params: Option<Vec<ParamConfig>>,
    pub query_params: Option<Vec<ParamConfig>>,
    pub request_headers: Option<Vec<ParamConfig>>,
    pub cookie_params: Option<Vec<ParamConfig>>,
    pub request_body: Option<RequestBodyDoc>,
    pub request_models: Option<IndexMap<String, String>>,
    pub method_responses: Option<Vec<MethodResponse>>,
}

/// An HTTP trigger on a function.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpEvent {
    pub path: String,
    pub method: String,

    #[serde(default)]
    pub authorizer: Option<Authorizer>,

    #[serde(default)]
    pub documentation: Option<Documentation>,
}

/// One event binding. Non-HTTP events deserialize with `http` unset and are
/// skipped during generation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub http: Option<HttpEvent>,
}

/// One deployed function with its event bindings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FunctionConfig {
    #[serde(default)]
    pub handler: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub events: Vec<Event>,
}

/// A function name paired with its configuration, as handed to the
/// generator.
#[derive(Debug, Clone)]
pub struct FunctionDescriptor {
    pub name: String,
    pub config: FunctionConfig,
}

/// Custom variables of a service description. Only `documentation` matters
/// here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomVars {
    #[serde(default)]
    pub documentation: Option<DocumentationConfig>,
}

/// A materialized service description: the standalone equivalent of what a
/// deployment framework would hand the plugin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceDescription {
    #[serde(default)]
    pub service: Option<String>,

    #[serde(default)]
    pub custom: CustomVars,

    #[serde(default)]
    pub functions: IndexMap<String, FunctionConfig>,
}

impl ServiceDescription {
    /// The documentation block, required for generation.
    pub fn documentation(&self) -> Result<&DocumentationConfig, ConfigError> {
        self.custom
            .documentation
            .as_ref()
            .ok_or(ConfigError::MissingDocumentation)
    }

    /// Pair every function with its name, preserving declaration order.
    pub fn function_descriptors(&self) -> Vec<FunctionDescriptor> {
        self.functions
            .iter()
            .map(|(name, config)| FunctionDescriptor {
                name: name.clone(),
                config: config.clone(),
            })
            .collect()
    }
}

/// Load a service description from a YAML file.
pub fn load_service(path: &Path) -> Result<ServiceDescription, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}
