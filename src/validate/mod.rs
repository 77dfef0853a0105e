//! Validator: a recursive, schema-directed interpreter. Rather than
//! compiling a schema into a tree of boxed validators once and replaying
//! it per instance, this walks the live schema `Value` directly on every
//! call.
mod array;
mod number;
mod object;
mod string;

use crate::error::{ValidationError, ValidationErrorKind};
use crate::store::Store;
use crate::uri::SchemaUri;
use serde_json::Value;

pub(crate) type Result = std::result::Result<(), ValidationError>;

/// Keywords the core deliberately doesn't implement; present on any schema
/// they make the schema unusable rather than silently permissive.
const UNSUPPORTED_ANY: &[&str] = &["allOf", "anyOf", "oneOf", "not"];
const UNSUPPORTED_STRING: &[&str] = &["format", "pattern"];

pub(crate) struct Context<'a> {
    pub(crate) store: &'a Store,
    pub(crate) insert_defaults: bool,
}

/// Entry point. Validates `instance` against `schema`, threading `path` for
/// diagnostics. Follows `$ref` (repeatedly, for chained references), checks
/// `enum`, refuses unsupported keywords, then dispatches on instance kind.
pub(crate) fn validate(ctx: &Context, schema: &Value, instance: &mut Value, path: &str) -> Result {
    let schema = chase_refs(ctx, schema, path)?;
    let object = match schema.as_object() {
        Some(object) => object,
        None => return Ok(()),
    };

    for keyword in UNSUPPORTED_ANY {
        if object.contains_key(*keyword) {
            return Err(ValidationError::unsupported(path, keyword));
        }
    }

    if let Some(options) = object.get("enum") {
        let options_array = options.as_array().cloned().unwrap_or_default();
        if !options_array.iter().any(|option| deep_eq(option, instance)) {
            return Err(ValidationError::new(
                path,
                ValidationErrorKind::Enum {
                    instance: instance.clone(),
                    options: options.clone(),
                },
            ));
        }
    }

    check_type(object, instance, path)?;

    match instance {
        Value::Object(_) => object::validate(ctx, object, instance, path),
        Value::Array(_) => array::validate(ctx, object, instance, path),
        Value::String(_) => string::validate(object, instance, path),
        Value::Number(_) => number::validate(object, instance, path),
        Value::Bool(_) | Value::Null => Ok(()),
    }
}

/// Follow `$ref` until the node no longer carries one. `$ref` values are
/// already absolute (the resolver rewrote them at ingestion time).
fn chase_refs<'a>(ctx: &'a Context, mut schema: &'a Value, path: &str) -> std::result::Result<&'a Value, ValidationError> {
    loop {
        let reference = match schema.as_object().and_then(|o| o.get("$ref")) {
            Some(Value::String(reference)) => reference.clone(),
            _ => return Ok(schema),
        };
        let uri = SchemaUri::parse(&reference)
            .map_err(|_| ValidationError::unresolved_reference(path, reference.clone()))?;
        schema = ctx
            .store
            .get(&uri)
            .ok_or_else(|| ValidationError::unresolved_reference(path, reference.clone()))?;
    }
}

/// `type` keyword check, common to every instance kind. A string value
/// must equal the expected tag; an array value must contain it. Absent
/// `type` places no constraint.
fn check_type(object: &serde_json::Map<String, Value>, instance: &Value, path: &str) -> Result {
    let type_keyword = match object.get("type") {
        Some(value) => value,
        None => return Ok(()),
    };
    let actual = type_tag(instance);
    let matches = match type_keyword {
        Value::String(expected) => tag_matches(expected, actual),
        Value::Array(expected) => expected
            .iter()
            .filter_map(Value::as_str)
            .any(|expected| tag_matches(expected, actual)),
        _ => true,
    };
    if matches {
        Ok(())
    } else {
        let expected = match type_keyword {
            Value::String(s) => vec![s.clone()],
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => vec![],
        };
        Err(ValidationError::new(
            path,
            ValidationErrorKind::Type {
                instance: instance.clone(),
                expected,
            },
        ))
    }
}

/// The instance's own type tag: `integer` for whole-valued numbers,
/// `number` for the rest.
fn type_tag(instance: &Value) -> &'static str {
    match instance {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
    }
}

/// `integer` also satisfies a `"number"` tag's counterpart in reverse isn't
/// true, but an instance tagged `integer` always satisfies `type: "number"`
/// per JSON Schema's numeric hierarchy, and `number` never satisfies
/// `type: "integer"` for a non-whole value.
fn tag_matches(expected: &str, actual: &'static str) -> bool {
    expected == actual || (expected == "number" && actual == "integer")
}

/// Deep, JSON-semantic equality: numbers compare by value regardless of
/// integer/float representation, objects compare unordered by key.
pub(crate) fn deep_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(p, q)| deep_eq(p, q))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).map_or(false, |w| deep_eq(v, w)))
        }
        _ => a == b,
    }
}

pub(crate) fn child_path(path: &str, key: &str) -> String {
    format!("{}.{}", path, key)
}

pub(crate) fn index_path(path: &str, index: usize) -> String {
    format!("{}[{}]", path, index)
}

pub(crate) fn refuse_string_keywords(
    object: &serde_json::Map<String, Value>,
    path: &str,
) -> Result {
    for keyword in UNSUPPORTED_STRING {
        if object.contains_key(*keyword) {
            return Err(ValidationError::unsupported(path, keyword));
        }
    }
    Ok(())
}
