pub mod config;
pub mod document;
pub mod error;
pub mod generator;
pub mod merge;
pub mod resolve;
pub mod service;
pub mod validate;

pub use config::{DocumentationConfig, Model, OutputConfig, OutputFormat};
pub use document::OpenApiDocument;
pub use error::{ConfigError, GenerateError, ResolveError};
pub use generator::DefinitionGenerator;
pub use service::{FunctionDescriptor, ServiceDescription};
pub use validate::ValidationReport;
