use std::path::PathBuf;

use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use crate::config::{DocumentationConfig, Model};
use crate::document::operation::{Header, MediaContent, Operation, RequestBody, Response};
use crate::document::parameter::{Parameter, ParameterLocation};
use crate::document::{Info, OPENAPI_VERSION, OpenApiDocument, SecurityRequirement};
use crate::error::GenerateError;
use crate::merge::deep_merge;
use crate::resolve::{clean_schema, resolve_models};
use crate::service::{
    Documentation, FunctionDescriptor, HttpEvent, ParamConfig, RequestBodyDoc,
};
use crate::validate::{self, ValidationReport};

/// Assembles an OpenAPI document from a documentation configuration and a
/// list of function descriptors.
///
/// Three ordered phases: [`parse`](Self::parse) seeds the skeleton and
/// resolves models, [`read_functions`](Self::read_functions) ingests routes,
/// [`validate`](Self::validate) checks the result. Phase order is the
/// caller's responsibility; route ingestion needs the schema registry in
/// place so `$ref` targets resolve.
pub struct DefinitionGenerator {
    config: DocumentationConfig,
    root: PathBuf,
    document: OpenApiDocument,
}

impl DefinitionGenerator {
    /// A generator for the given documentation config. `root` anchors
    /// relative model file paths.
    pub fn new(config: DocumentationConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            root: root.into(),
            document: OpenApiDocument::default(),
        }
    }

    /// Phase 1: seed the document skeleton and populate
    /// `components.schemas` from the model registry.
    ///
    /// `title` and `description` default to empty strings; `version`
    /// defaults to a fresh UUID so repeated undocumented runs stay
    /// distinguishable.
    pub fn parse(&mut self) -> Result<(), GenerateError> {
        self.document.openapi = OPENAPI_VERSION.to_string();
        self.document.info = Info {
            title: self.config.title.clone().unwrap_or_default(),
            description: self.config.description.clone().unwrap_or_default(),
            version: self
                .config
                .version
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
        };
        self.document.servers = self.config.servers.clone();
        self.document.security = self.config.security.clone();

        if let Some(schemes) = &self.config.security_schemes {
            // The authorizer binding stays in config; only the scheme body
            // is emitted.
            let emitted = schemes
                .iter()
                .map(|(name, config)| (name.clone(), Value::Object(config.scheme.clone())))
                .collect();
            self.document.components.security_schemes = Some(emitted);
        }

        self.document.components.schemas =
            resolve_models(self.config.models.as_deref(), &self.root)?;

        Ok(())
    }

    /// Phase 2: synthesize one operation per documented HTTP event and
    /// deep-merge it into `paths`.
    ///
    /// Events without an `http` binding or without a `documentation` block
    /// leave the document untouched.
    pub fn read_functions(
        &mut self,
        functions: &[FunctionDescriptor],
    ) -> Result<(), GenerateError> {
        for function in functions {
            for event in &function.config.events {
                let Some(http) = &event.http else {
                    continue;
                };
                let Some(documentation) = &http.documentation else {
                    continue;
                };

                let operation =
                    self.operation_from_config(&function.name, http, documentation)?;
                let operation = serde_json::to_value(operation)?;

                let path = format!("/{}", http.path);
                let method = http.method.to_ascii_lowercase();
                log::debug!("adding operation {} {}", method, path);

                let item = self.document.paths.entry(path).or_default();
                match item.get_mut(&method) {
                    Some(existing) => deep_merge(existing, operation),
                    None => {
                        item.insert(method, operation);
                    }
                }
            }
        }
        Ok(())
    }

    /// Phase 3: run the accumulated document through the OpenAPI 3.0
    /// meta-schema. Non-conformance is reported, never thrown; the document
    /// stays available for output either way.
    pub fn validate(&self) -> ValidationReport {
        validate::validate_document(&self.document)
    }

    /// The assembled document.
    pub fn definition(&self) -> &OpenApiDocument {
        &self.document
    }

    /// Consume the generator, yielding the document.
    pub fn into_definition(self) -> OpenApiDocument {
        self.document
    }

    fn operation_from_config(
        &self,
        function_name: &str,
        http: &HttpEvent,
        documentation: &Documentation,
    ) -> Result<Operation, GenerateError> {
        let mut operation = Operation {
            operation_id: function_name.to_string(),
            ..Operation::default()
        };

        operation.summary = documentation.summary.clone();
        operation.description = documentation.description.clone();
        operation.tags = documentation.tags.clone();
        // Only an explicit true marks the operation deprecated.
        if documentation.deprecated == Some(true) {
            operation.deprecated = Some(true);
        }

        if documentation.request_body.is_some() || documentation.request_models.is_some() {
            let request_models = documentation.request_models.as_ref().ok_or_else(|| {
                GenerateError::MissingRequestModels {
                    operation: function_name.to_string(),
                }
            })?;
            operation.request_body = Some(
                self.request_body_from_config(request_models, documentation.request_body.as_ref()),
            );
        }

        operation.parameters = self.parameters_from_config(documentation);
        operation.responses = self.responses_from_config(documentation);
        operation.security = self.security_for_event(http);

        Ok(operation)
    }

    /// Derive parameters from the four categories in fixed order, keeping
    /// declared order within each category.
    fn parameters_from_config(&self, documentation: &Documentation) -> Vec<Parameter> {
        let mut parameters = Vec::new();

        for location in ParameterLocation::ALL {
            let Some(block) = param_block(documentation, location) else {
                continue;
            };

            for config in block {
                let mut parameter = Parameter::new(config.name.clone(), location);
                parameter.description = config.description.clone().unwrap_or_default();
                parameter.required = config.required.unwrap_or(false);

                match location {
                    // Path parameters are always required, whatever the
                    // block declares.
                    ParameterLocation::Path => parameter.required = true,
                    ParameterLocation::Query => {
                        parameter.allow_empty_value =
                            Some(config.allow_empty_value.unwrap_or(false));
                        if let Some(allow_reserved) = config.allow_reserved {
                            parameter.allow_reserved = Some(allow_reserved);
                        }
                    }
                    _ => {}
                }

                if let Some(deprecated) = config.deprecated {
                    parameter.deprecated = Some(deprecated);
                }

                if let Some(style) = &config.style {
                    parameter.style = Some(style.clone());
                    parameter.explode = Some(config.explode.unwrap_or(style == "form"));
                }

                if let Some(schema) = &config.schema {
                    parameter.schema = Some(clean_schema(schema.clone()));
                }

                // The singular example wins here; request/response content
                // prefers the plural form. Intentional asymmetry, kept from
                // the documentation format this mirrors.
                if config.example.is_some() {
                    parameter.example = config.example.clone();
                } else if config.examples.is_some() {
                    parameter.examples = config.examples.clone();
                }

                parameter.content = config.content.clone();

                parameters.push(parameter);
            }
        }

        parameters
    }

    fn request_body_from_config(
        &self,
        request_models: &IndexMap<String, String>,
        body_doc: Option<&RequestBodyDoc>,
    ) -> RequestBody {
        let mut body = RequestBody::default();

        for (content_type, model_name) in request_models {
            let Some(model) = self.model_last(model_name) else {
                continue;
            };

            let mut media = MediaContent::for_model(model_name);
            attach_examples(model, &mut media);
            body.content.insert(content_type.clone(), media);

            if let Some(description) = body_doc.and_then(|doc| doc.description.as_ref()) {
                body.description = Some(description.clone());
            }
        }

        body
    }

    fn responses_from_config(
        &self,
        documentation: &Documentation,
    ) -> IndexMap<String, Response> {
        let mut responses = IndexMap::new();

        let Some(method_responses) = &documentation.method_responses else {
            return responses;
        };

        for method_response in method_responses {
            let description = method_response
                .response_body
                .as_ref()
                .and_then(|body| body.description.clone())
                .unwrap_or_else(|| format!("Status {} Response", method_response.status_code));

            let mut response = Response {
                description,
                content: self.response_content(&method_response.response_models),
                headers: None,
            };

            if let Some(headers) = &method_response.response_headers {
                let mut derived = IndexMap::new();
                for header in headers {
                    derived.insert(
                        header.name.clone(),
                        Header {
                            description: header
                                .description
                                .clone()
                                .unwrap_or_else(|| format!("{} header", header.name)),
                            schema: header.schema.clone().map(clean_schema),
                        },
                    );
                }
                response.headers = Some(derived);
            }

            responses.insert(method_response.status_code.clone(), response);
        }

        responses
    }

    fn response_content(
        &self,
        response_models: &IndexMap<String, String>,
    ) -> IndexMap<String, MediaContent> {
        let mut content = IndexMap::new();

        for (content_type, model_name) in response_models {
            let Some(model) = self.model_first(model_name) else {
                continue;
            };

            let mut media = MediaContent::for_model(model_name);
            attach_examples(model, &mut media);
            content.insert(content_type.clone(), media);
        }

        content
    }

    fn security_for_event(&self, http: &HttpEvent) -> Option<Vec<SecurityRequirement>> {
        let authorizer = http.authorizer.as_ref()?;
        let schemes = self.config.security_schemes.as_ref()?;
        let (scheme_name, _) = schemes
            .iter()
            .find(|(_, scheme)| scheme.authorizer_name.as_deref() == Some(authorizer.name()))?;

        let mut requirement = SecurityRequirement::new();
        requirement.insert(scheme_name.clone(), Vec::new());
        Some(vec![requirement])
    }

    /// Registry lookup for request bodies: the last declaration of a
    /// duplicated model name wins.
    fn model_last(&self, name: &str) -> Option<&Model> {
        self.registry().iter().rev().find(|model| model.name == name)
    }

    /// Registry lookup for responses: the first declaration wins.
    fn model_first(&self, name: &str) -> Option<&Model> {
        self.registry().iter().find(|model| model.name == name)
    }

    fn registry(&self) -> &[Model] {
        self.config.models.as_deref().unwrap_or_default()
    }
}

/// The documentation field feeding each parameter category.
fn param_block(
    documentation: &Documentation,
    location: ParameterLocation,
) -> Option<&[ParamConfig]> {
    match location {
        ParameterLocation::Path => documentation.path_params.as_deref(),
        ParameterLocation::Query => documentation.query_params.as_deref(),
        ParameterLocation::Header => documentation.request_headers.as_deref(),
        ParameterLocation::Cookie => documentation.cookie_params.as_deref(),
    }
}

/// Carry a model's examples onto content. The plural `examples` sequence
/// wins over the singular `example` on request and response content.
fn attach_examples(model: &Model, media: &mut MediaContent) {
    if let Some(examples) = &model.examples {
        media.examples = Some(examples.clone());
    } else if let Some(example) = &model.example {
        media.example = Some(example.clone());
    }
}
