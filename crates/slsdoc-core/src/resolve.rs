use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::{Model, ModelSchema};
use crate::error::ResolveError;

/// Bound on file hops and pointer expansions while bundling. Guards against
/// cyclic reference graphs in malformed input.
const MAX_REF_DEPTH: usize = 100;

/// Resolve the model registry into the document's schema components.
///
/// Inline schemas are used directly; string schemas are loaded relative to
/// `root` and bundled into a self-contained tree. Every resolved schema has
/// `$schema` stripped and local `#/definitions` references rewritten into
/// the `#/components/schemas` namespace. A file-based schema's own
/// definitions become independently addressable components before the model
/// itself is added under its declared name; later models with the same name
/// win.
pub fn resolve_models(
    models: Option<&[Model]>,
    root: &Path,
) -> Result<IndexMap<String, Value>, ResolveError> {
    let models = models.ok_or(ResolveError::MissingModels)?;
    let mut schemas = IndexMap::new();

    for model in models {
        let Some(schema) = &model.schema else {
            continue;
        };

        match schema {
            ModelSchema::Inline(value) => {
                schemas.insert(model.name.clone(), rewrite_refs(clean_schema(value.clone())));
            }
            ModelSchema::File(relative) => {
                let path = root.join(relative);
                log::debug!("bundling model {} from {}", model.name, path.display());
                let mut bundled = bundle_file(&path, 0)?;

                // Hoist the bundled document's definitions into the
                // top-level mapping so its sub-schemas stay addressable
                // after the reference rewrite.
                let definitions = bundled
                    .as_object_mut()
                    .and_then(|map| map.shift_remove("definitions"));
                if let Some(Value::Object(definitions)) = definitions {
                    for (name, definition) in definitions {
                        schemas.insert(name, rewrite_refs(clean_schema(definition)));
                    }
                }

                schemas.insert(model.name.clone(), rewrite_refs(clean_schema(bundled)));
            }
        }
    }

    Ok(schemas)
}

/// Strip the `$schema` meta-property. OpenAPI does not permit it.
pub fn clean_schema(mut value: Value) -> Value {
    if let Some(map) = value.as_object_mut() {
        map.shift_remove("$schema");
    }
    value
}

/// Rewrite every local `#/definitions` reference to point into the
/// document's `#/components/schemas` container.
pub fn rewrite_refs(value: Value) -> Value {
    rewrite_refs_bounded(value, MAX_REF_DEPTH)
}

fn rewrite_refs_bounded(value: Value, depth: usize) -> Value {
    match value {
        Value::Object(mut map) => {
            if let Some(Value::String(reference)) = map.get("$ref") {
                let rewritten = reference.replacen("#/definitions", "#/components/schemas", 1);
                map.insert("$ref".to_string(), Value::String(rewritten));
                return Value::Object(map);
            }
            if depth == 0 {
                // Pathologically deep input stops here instead of
                // overflowing the stack.
                return Value::Object(map);
            }
            map.into_iter()
                .map(|(key, value)| (key, rewrite_refs_bounded(value, depth - 1)))
                .collect()
        }
        Value::Array(items) => {
            if depth == 0 {
                return Value::Array(items);
            }
            items
                .into_iter()
                .map(|item| rewrite_refs_bounded(item, depth - 1))
                .collect()
        }
        scalar => scalar,
    }
}

/// Load a schema file and inline every external `$ref` it contains.
fn bundle_file(path: &Path, depth: usize) -> Result<Value, ResolveError> {
    if depth > MAX_REF_DEPTH {
        return Err(ResolveError::DepthLimit {
            path: path.to_path_buf(),
        });
    }

    let mut document = load_document(path)?;
    let base_dir = path.parent().unwrap_or(Path::new("")).to_path_buf();
    inline_file_refs(&mut document, &base_dir, path, depth)?;
    Ok(document)
}

fn load_document(path: &Path) -> Result<Value, ResolveError> {
    let content = fs::read_to_string(path).map_err(|source| ResolveError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    match extension {
        "yml" | "yaml" => {
            serde_yaml_ng::from_str(&content).map_err(|source| ResolveError::Parse {
                path: path.to_path_buf(),
                reason: source.to_string(),
            })
        }
        _ => serde_json::from_str(&content).map_err(|source| ResolveError::Parse {
            path: path.to_path_buf(),
            reason: source.to_string(),
        }),
    }
}

/// Replace external file references (`other.json#/definitions/Foo`) with the
/// referenced subtree. The included subtree has its own internal pointers
/// dereferenced against its source document so the result is
/// self-contained; internal references of the file being bundled are left
/// for the later rewrite into `components/schemas`.
fn inline_file_refs(
    node: &mut Value,
    base_dir: &Path,
    origin: &Path,
    depth: usize,
) -> Result<(), ResolveError> {
    match node {
        Value::Object(map) => {
            let external = match map.get("$ref") {
                Some(Value::String(reference)) if !reference.starts_with('#') => {
                    Some(reference.clone())
                }
                _ => None,
            };

            if let Some(reference) = external {
                let (file_part, fragment) = match reference.split_once('#') {
                    Some((file, pointer)) => (file, Some(pointer.to_string())),
                    None => (reference.as_str(), None),
                };

                let target = base_dir.join(file_part);
                let target_doc = bundle_file(&target, depth + 1)?;

                let mut resolved = match fragment.as_deref() {
                    None | Some("") => target_doc.clone(),
                    Some(pointer) => target_doc.pointer(pointer).cloned().ok_or_else(|| {
                        ResolveError::UnresolvedRef {
                            reference: reference.clone(),
                            path: origin.to_path_buf(),
                        }
                    })?,
                };
                deref_internal(&mut resolved, &target_doc, &target, depth)?;

                *node = resolved;
                return Ok(());
            }

            for value in map.values_mut() {
                inline_file_refs(value, base_dir, origin, depth)?;
            }
        }
        Value::Array(items) => {
            for item in items {
                inline_file_refs(item, base_dir, origin, depth)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Fully expand `#/...` pointers against `root`. Used on included subtrees,
/// whose internal pointers would dangle once spliced into another document.
fn deref_internal(
    node: &mut Value,
    root: &Value,
    origin: &Path,
    depth: usize,
) -> Result<(), ResolveError> {
    if depth > MAX_REF_DEPTH {
        return Err(ResolveError::DepthLimit {
            path: origin.to_path_buf(),
        });
    }

    match node {
        Value::Object(map) => {
            let internal = match map.get("$ref") {
                Some(Value::String(reference)) if reference.starts_with('#') => {
                    Some(reference.clone())
                }
                _ => None,
            };

            if let Some(reference) = internal {
                let pointer = &reference[1..];
                let mut resolved = root.pointer(pointer).cloned().ok_or_else(|| {
                    ResolveError::UnresolvedRef {
                        reference: reference.clone(),
                        path: origin.to_path_buf(),
                    }
                })?;
                deref_internal(&mut resolved, root, origin, depth + 1)?;
                *node = resolved;
                return Ok(());
            }

            for value in map.values_mut() {
                deref_internal(value, root, origin, depth)?;
            }
        }
        Value::Array(items) => {
            for item in items {
                deref_internal(item, root, origin, depth)?;
            }
        }
        _ => {}
    }
    Ok(())
}
