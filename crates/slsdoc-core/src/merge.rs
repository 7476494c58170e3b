use serde_json::Value;

/// Recursively merge `overlay` into `base`. Object keys combine; sequences
/// and scalars are replaced wholesale by the later value.
///
/// Two route descriptors can populate different methods under the same path
/// without clobbering each other, while repeated merges at the same method
/// assemble one operation incrementally.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_objects_combine_recursively() {
        let mut base = json!({"a": {"x": 1}, "b": 2});
        deep_merge(&mut base, json!({"a": {"y": 3}, "c": 4}));
        assert_eq!(base, json!({"a": {"x": 1, "y": 3}, "b": 2, "c": 4}));
    }

    #[test]
    fn test_sequences_replace_wholesale() {
        let mut base = json!({"parameters": [{"name": "a"}, {"name": "b"}]});
        deep_merge(&mut base, json!({"parameters": [{"name": "c"}]}));
        assert_eq!(base, json!({"parameters": [{"name": "c"}]}));
    }

    #[test]
    fn test_scalars_replace() {
        let mut base = json!({"summary": "old", "description": "kept"});
        deep_merge(&mut base, json!({"summary": "new"}));
        assert_eq!(base, json!({"summary": "new", "description": "kept"}));
    }

    #[test]
    fn test_type_mismatch_replaces() {
        let mut base = json!({"value": {"nested": true}});
        deep_merge(&mut base, json!({"value": [1, 2]}));
        assert_eq!(base, json!({"value": [1, 2]}));
    }
}
