//! Object validation and default-value insertion.
use super::{child_path, validate as validate_schema, Context, Result};
use crate::error::{ValidationError, ValidationErrorKind};
use regex::Regex;
use serde_json::{Map, Value};

pub(crate) fn validate(
    ctx: &Context,
    object: &Map<String, Value>,
    instance: &mut Value,
    path: &str,
) -> Result {
    if ctx.insert_defaults {
        insert_defaults(object, instance);
    }

    let size = instance.as_object().unwrap().len();
    if let Some(limit) = object.get("maxProperties").and_then(Value::as_u64) {
        if size as u64 > limit {
            return Err(ValidationError::new(
                path,
                ValidationErrorKind::MaxProperties { size, limit },
            ));
        }
    }
    if let Some(limit) = object.get("minProperties").and_then(Value::as_u64) {
        if (size as u64) < limit {
            return Err(ValidationError::new(
                path,
                ValidationErrorKind::MinProperties { size, limit },
            ));
        }
    }

    let properties = object.get("properties").and_then(Value::as_object);
    let pattern_properties = object.get("patternProperties").and_then(Value::as_object);
    let additional = object.get("additionalProperties");

    let keys: Vec<String> = instance.as_object().unwrap().keys().cloned().collect();
    for key in &keys {
        if let Some(subschema) = properties.and_then(|p| p.get(key)) {
            let child = instance.as_object_mut().unwrap().get_mut(key).unwrap();
            self::validate_inner(ctx, subschema, child, &child_path(path, key))?;
            continue;
        }

        let mut matched_pattern = false;
        if let Some(patterns) = pattern_properties {
            for (pattern, subschema) in patterns {
                let re = Regex::new(pattern).map_err(|_| {
                    ValidationError::unsupported(path, "patternProperties")
                })?;
                if re.is_match(key) {
                    matched_pattern = true;
                    let child = instance.as_object_mut().unwrap().get_mut(key).unwrap();
                    self::validate_inner(ctx, subschema, child, &child_path(path, key))?;
                }
            }
        }
        if matched_pattern {
            continue;
        }

        match additional {
            None | Some(Value::Bool(true)) => {}
            Some(Value::Bool(false)) => {
                return Err(ValidationError::new(
                    path,
                    ValidationErrorKind::UnknownProperty(key.clone()),
                ));
            }
            Some(subschema) => {
                let child = instance.as_object_mut().unwrap().get_mut(key).unwrap();
                self::validate_inner(ctx, subschema, child, &child_path(path, key))?;
            }
        }
    }

    if let Some(required) = object.get("required").and_then(Value::as_array) {
        let instance_map = instance.as_object().unwrap();
        for name in required.iter().filter_map(Value::as_str) {
            if !instance_map.contains_key(name) {
                return Err(ValidationError::new(
                    path,
                    ValidationErrorKind::Required(name.to_string()),
                ));
            }
        }
    }

    if let Some(dependencies) = object.get("dependencies").and_then(Value::as_object) {
        let present: Vec<String> = dependencies
            .keys()
            .filter(|key| instance.as_object().unwrap().contains_key(*key))
            .cloned()
            .collect();
        for key in present {
            match &dependencies[&key] {
                Value::Object(_) => {
                    let subschema = &dependencies[&key];
                    self::validate_inner(ctx, subschema, instance, path)?;
                }
                Value::Array(names) => {
                    let instance_map = instance.as_object().unwrap();
                    for name in names.iter().filter_map(Value::as_str) {
                        if !instance_map.contains_key(name) {
                            return Err(ValidationError::new(
                                path,
                                ValidationErrorKind::DependencyRequired {
                                    depends_on: key.clone(),
                                    missing: name.to_string(),
                                },
                            ));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn validate_inner(ctx: &Context, schema: &Value, instance: &mut Value, path: &str) -> Result {
    validate_schema(ctx, schema, instance, path)
}

/// Insert `default` values for immediate, named `properties` missing from
/// the instance. Does not look through `$ref`, and does not recurse: a
/// sub-object's own defaults are applied when the recursive validator
/// visits it in turn.
fn insert_defaults(object: &Map<String, Value>, instance: &mut Value) {
    let properties = match object.get("properties").and_then(Value::as_object) {
        Some(properties) => properties,
        None => return,
    };
    let instance_map = instance.as_object_mut().unwrap();
    for (key, subschema) in properties {
        if instance_map.contains_key(key) {
            continue;
        }
        if let Some(default) = subschema.get("default") {
            instance_map.insert(key.clone(), default.clone());
        }
    }
}
