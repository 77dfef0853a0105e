//! Resolver: walks one freshly-loaded schema tree in pre-order, assigns
//! every sub-schema a canonical [`SchemaUri`], rewrites `$ref` strings to
//! absolute form in place, and reports the references produced.
use crate::error::SchemaError;
use crate::uri::SchemaUri;
use serde_json::Value;
use std::collections::BTreeSet;

/// Everything the resolver learned about one schema tree.
pub struct Resolution {
    /// `(uri, json_pointer)` for every sub-schema node found, in traversal
    /// order (stable, since `serde_json::Map` preserves insertion order).
    pub bindings: Vec<(SchemaUri, String)>,
    /// `$ref` targets whose `base` differs from the document's own base:
    /// not yet known to be satisfiable, returned to the caller to resolve.
    pub external: BTreeSet<SchemaUri>,
}

/// Walk `tree` (mutably, to rewrite `$ref` values), starting at `root_uri`.
/// Fails on a duplicate sub-schema URI or a local `$ref` with no matching
/// node once the whole tree has been walked.
pub fn resolve(root_uri: &SchemaUri, tree: &mut Value) -> Result<Resolution, SchemaError> {
    let mut walker = Walker {
        root_base: root_uri.url().to_string(),
        bindings: Vec::new(),
        refs: BTreeSet::new(),
    };
    walker.walk(root_uri, String::new(), tree)?;

    let mut external = BTreeSet::new();
    let known: BTreeSet<&SchemaUri> = walker.bindings.iter().map(|(uri, _)| uri).collect();
    for reference in &walker.refs {
        if reference.url() == walker.root_base {
            if !known.contains(reference) {
                return Err(SchemaError::MissingLocalReference(reference.to_string()));
            }
        } else {
            external.insert(reference.clone());
        }
    }

    Ok(Resolution {
        bindings: walker.bindings,
        external,
    })
}

struct Walker {
    root_base: String,
    bindings: Vec<(SchemaUri, String)>,
    refs: BTreeSet<SchemaUri>,
}

impl Walker {
    fn walk(&mut self, uri: &SchemaUri, pointer: String, node: &mut Value) -> Result<(), SchemaError> {
        let uri = match node.as_object().and_then(|o| o.get("id")).and_then(Value::as_str) {
            Some(id) => uri.derive(id)?,
            None => uri.clone(),
        };

        if self.bindings.iter().any(|(bound, _)| bound == &uri) {
            return Err(SchemaError::DuplicateSubschema(uri.to_string()));
        }
        self.bindings.push((uri.clone(), pointer.clone()));

        let object = match node {
            Value::Object(map) => map,
            _ => return Ok(()),
        };
        let keys: Vec<String> = object.keys().cloned().collect();
        for key in keys {
            if key == "default" {
                continue;
            }
            if key == "$ref" {
                let is_string = matches!(object.get("$ref"), Some(Value::String(_)));
                if is_string {
                    let reference = match object.get("$ref") {
                        Some(Value::String(s)) => s.clone(),
                        _ => unreachable!(),
                    };
                    let absolute = uri.derive(&reference)?;
                    object.insert("$ref".to_string(), Value::String(absolute.to_string()));
                    self.refs.insert(absolute);
                }
                continue;
            }
            let escaped = SchemaUri::escape(&key);
            let child_pointer = format!("{}/{}", pointer, escaped);
            match object.get_mut(&key) {
                Some(Value::Object(_)) => {
                    let child_uri = uri.append(&escaped);
                    self.walk(&child_uri, child_pointer, object.get_mut(&key).unwrap())?;
                }
                Some(Value::Array(_)) => {
                    let array = object.get_mut(&key).unwrap().as_array_mut().unwrap();
                    for (index, element) in array.iter_mut().enumerate() {
                        if element.is_object() {
                            let child_uri = uri.append(&escaped).append(&index.to_string());
                            let element_pointer = format!("{}/{}", child_pointer, index);
                            self.walk(&child_uri, element_pointer, element)?;
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn assigns_uris_to_nested_objects() {
        let mut tree = json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "number"}
            }
        });
        let resolution = resolve(&SchemaUri::root(), &mut tree).unwrap();
        let uris: Vec<String> = resolution
            .bindings
            .iter()
            .map(|(uri, _)| uri.to_string())
            .collect();
        assert!(uris.contains(&"#".to_string()));
        assert!(uris.contains(&"#/properties".to_string()));
        assert!(uris.contains(&"#/properties/name".to_string()));
        assert!(uris.contains(&"#/properties/age".to_string()));
        assert!(resolution.external.is_empty());
    }

    #[test]
    fn rewrites_ref_to_absolute_form() {
        let mut tree = json!({
            "definitions": {"a": {"type": "string"}},
            "$ref": "#/definitions/a"
        });
        let resolution = resolve(&SchemaUri::root(), &mut tree).unwrap();
        assert_eq!(tree["$ref"], json!("#/definitions/a"));
        assert!(resolution.external.is_empty());
    }

    #[test]
    fn detects_missing_local_reference() {
        let mut tree = json!({"$ref": "#/definitions/missing"});
        let err = resolve(&SchemaUri::root(), &mut tree).unwrap_err();
        assert!(matches!(err, SchemaError::MissingLocalReference(_)));
    }

    #[test]
    fn reports_external_reference() {
        let mut tree = json!({"$ref": "http://other/s2#"});
        let resolution = resolve(&SchemaUri::root(), &mut tree).unwrap();
        assert_eq!(resolution.external.len(), 1);
        assert_eq!(
            resolution.external.iter().next().unwrap().to_string(),
            "http://other/s2#"
        );
    }

    #[test]
    fn detects_duplicate_subschema_uri_via_id_collision() {
        let mut tree = json!({
            "properties": {
                "a": {"id": "#/properties/b", "type": "string"},
                "b": {"type": "number"}
            }
        });
        let err = resolve(&SchemaUri::root(), &mut tree);
        assert!(err.is_err());
    }

    #[test]
    fn array_items_schemas_get_indexed_uris() {
        let mut tree = json!({
            "items": [{"type": "string"}, {"type": "number"}]
        });
        let resolution = resolve(&SchemaUri::root(), &mut tree).unwrap();
        let uris: Vec<String> = resolution
            .bindings
            .iter()
            .map(|(uri, _)| uri.to_string())
            .collect();
        assert!(uris.contains(&"#/items/0".to_string()));
        assert!(uris.contains(&"#/items/1".to_string()));
    }

    #[test]
    fn default_values_are_not_descended_into() {
        let mut tree = json!({
            "properties": {"width": {"type": "integer", "default": {"type": "not-a-schema"}}}
        });
        let resolution = resolve(&SchemaUri::root(), &mut tree).unwrap();
        let uris: Vec<String> = resolution
            .bindings
            .iter()
            .map(|(uri, _)| uri.to_string())
            .collect();
        assert!(!uris.iter().any(|u| u.contains("default")));
    }
}
