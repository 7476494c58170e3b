use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading service or output configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse service description {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("no \"documentation\" section in the custom block of the service description")]
    MissingDocumentation,

    #[error("invalid output format {0:?}, expected \"yaml\" or \"json\"")]
    InvalidFormat(String),
}

/// Errors raised while resolving model schemas.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("documentation configuration defines no models")]
    MissingModels,

    #[error("failed to read schema file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("unresolved reference {reference:?} in {}", path.display())]
    UnresolvedRef { reference: String, path: PathBuf },

    #[error("reference depth limit exceeded while bundling {}", path.display())]
    DepthLimit { path: PathBuf },
}

/// Errors raised while assembling the OpenAPI document.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("requestModels is required to build the request body of operation {operation:?}")]
    MissingRequestModels { operation: String },

    #[error("failed to serialize operation: {0}")]
    Serialize(#[from] serde_json::Error),
}
