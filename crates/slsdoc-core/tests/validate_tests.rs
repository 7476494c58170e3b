use serde_json::json;

use slsdoc_core::generator::DefinitionGenerator;
use slsdoc_core::service::FunctionDescriptor;
use slsdoc_core::validate::validate_value;

fn generator_for(config_yaml: &str, function_yaml: &str) -> DefinitionGenerator {
    let mut generator =
        DefinitionGenerator::new(serde_yaml_ng::from_str(config_yaml).unwrap(), ".");
    generator.parse().unwrap();
    generator
        .read_functions(&[FunctionDescriptor {
            name: "getUsers".to_string(),
            config: serde_yaml_ng::from_str(function_yaml).unwrap(),
        }])
        .unwrap();
    generator
}

const CONFIG: &str = r#"
title: T
version: "1.0"
models:
  - name: User
    schema:
      type: object
"#;

#[test]
fn well_formed_document_passes() {
    let generator = generator_for(
        CONFIG,
        r#"
events:
  - http:
      path: users
      method: GET
      documentation:
        methodResponses:
          - statusCode: 200
            responseModels:
              application/json: User
"#,
    );

    let report = generator.validate();
    assert!(report.valid, "unexpected issues: {:?}", report.error);
    assert!(report.context.is_empty());
    assert!(report.error.is_none());
}

#[test]
fn empty_responses_fail_without_aborting() {
    let generator = generator_for(
        CONFIG,
        r#"
events:
  - http:
      path: users
      method: GET
      documentation:
        summary: No responses declared
"#,
    );

    let report = generator.validate();
    assert!(!report.valid);

    let issues = report.error.expect("expected issues");
    assert!(!issues.is_empty());
    assert!(issues[0].data_path.starts_with("/paths"));
    assert!(report.context.contains(&issues[0].data_path));

    // Non-conformance is reported, not thrown; the document survives.
    assert!(generator.definition().paths.contains_key("/users"));
}

#[test]
fn wrong_openapi_version_is_rejected() {
    let report = validate_value(&json!({
        "openapi": "2.0.0",
        "info": {"title": "T", "version": "1.0"},
        "paths": {}
    }));
    assert!(!report.valid);
    assert!(report.error.unwrap().iter().any(|issue| issue.data_path == "/openapi"));
}

#[test]
fn missing_info_fields_are_reported() {
    let report = validate_value(&json!({
        "openapi": "3.0.0",
        "info": {"title": "T"},
        "paths": {}
    }));
    assert!(!report.valid);
}

#[test]
fn report_serializes_with_wire_field_names() {
    let generator = generator_for(
        CONFIG,
        r#"
events:
  - http:
      path: users
      method: GET
      documentation:
        summary: No responses declared
"#,
    );

    let serialized = serde_json::to_value(generator.validate()).unwrap();
    assert_eq!(serialized["valid"], json!(false));
    assert!(serialized["error"][0].get("dataPath").is_some());
    assert!(serialized["error"][0].get("schemaPath").is_some());
}
