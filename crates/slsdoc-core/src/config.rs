use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::document::{SecurityRequirement, Server};
use crate::error::ConfigError;

/// A model schema: either a path to a schema file (relative to the service
/// root) or an inline JSON Schema object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ModelSchema {
    File(String),
    Inline(Value),
}

/// A named request/response payload shape, registered once and referenced
/// by name from operations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub content_type: Option<String>,

    #[serde(default)]
    pub schema: Option<ModelSchema>,

    #[serde(default)]
    pub example: Option<Value>,

    #[serde(default)]
    pub examples: Option<Vec<Value>>,
}

/// A configured security scheme. `authorizer_name` binds the scheme to a
/// function authorizer and is stripped from the emitted scheme object.
#[derive(Debug, Clone, Deserialize)]
pub struct SecuritySchemeConfig {
    #[serde(rename = "authorizerName", default)]
    pub authorizer_name: Option<String>,

    #[serde(flatten)]
    pub scheme: serde_json::Map<String, Value>,
}

/// The documentation block driving generation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentationConfig {
    pub title: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub servers: Option<Vec<Server>>,
    pub security: Option<Vec<SecurityRequirement>>,
    pub security_schemes: Option<IndexMap<String, SecuritySchemeConfig>>,
    pub models: Option<Vec<Model>>,
}

/// Serialization format for the written document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidFormat(value.to_string())),
        }
    }
}

/// Resolved output options: where and how the document is written.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub file: PathBuf,
    pub format: OutputFormat,
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("openapi.yml"),
            format: OutputFormat::Yaml,
            indent: 2,
        }
    }
}

impl OutputConfig {
    /// Resolve output options from raw CLI values. The default file name
    /// follows the format when no explicit output path is given.
    pub fn resolve(
        format: Option<&str>,
        output: Option<PathBuf>,
        indent: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let format = match format {
            Some(raw) => raw.parse()?,
            None => OutputFormat::Yaml,
        };

        let file = output.unwrap_or_else(|| match format {
            OutputFormat::Yaml => PathBuf::from("openapi.yml"),
            OutputFormat::Json => PathBuf::from("openapi.json"),
        });

        Ok(Self {
            file,
            format,
            indent: indent.unwrap_or(2),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("yaml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("YAML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!(matches!(
            "xml".parse::<OutputFormat>(),
            Err(ConfigError::InvalidFormat(value)) if value == "xml"
        ));
    }

    #[test]
    fn test_output_defaults_follow_format() {
        let config = OutputConfig::resolve(None, None, None).unwrap();
        assert_eq!(config.file, PathBuf::from("openapi.yml"));
        assert_eq!(config.format, OutputFormat::Yaml);
        assert_eq!(config.indent, 2);

        let config = OutputConfig::resolve(Some("json"), None, Some(4)).unwrap();
        assert_eq!(config.file, PathBuf::from("openapi.json"));
        assert_eq!(config.indent, 4);
    }

    #[test]
    fn test_explicit_output_wins() {
        let config =
            OutputConfig::resolve(Some("json"), Some(PathBuf::from("api/spec.json")), None)
                .unwrap();
        assert_eq!(config.file, PathBuf::from("api/spec.json"));
    }

    #[test]
    fn test_model_schema_variants() {
        let yaml = r#"
name: User
contentType: application/json
schema: models/user.json
"#;
        let model: Model = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(matches!(model.schema, Some(ModelSchema::File(ref p)) if p == "models/user.json"));

        let yaml = r#"
name: ErrorResponse
schema:
  type: object
  properties:
    message:
      type: string
"#;
        let model: Model = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(matches!(model.schema, Some(ModelSchema::Inline(_))));
    }

    #[test]
    fn test_security_scheme_splits_authorizer_binding() {
        let yaml = r#"
authorizerName: verify_token
type: http
scheme: bearer
bearerFormat: JWT
"#;
        let scheme: SecuritySchemeConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(scheme.authorizer_name.as_deref(), Some("verify_token"));
        assert!(!scheme.scheme.contains_key("authorizerName"));
        assert_eq!(scheme.scheme["type"], "http");
    }
}
