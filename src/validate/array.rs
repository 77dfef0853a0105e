//! Array validation: cardinality, uniqueness, and the `items`/
//! `additionalItems` joint rule.
use super::{deep_eq, index_path, validate as validate_schema, Context, Result};
use crate::error::{ValidationError, ValidationErrorKind};
use serde_json::{Map, Value};

pub(crate) fn validate(
    ctx: &Context,
    object: &Map<String, Value>,
    instance: &mut Value,
    path: &str,
) -> Result {
    let size = instance.as_array().unwrap().len();
    if let Some(limit) = object.get("maxItems").and_then(Value::as_u64) {
        if size as u64 > limit {
            return Err(ValidationError::new(
                path,
                ValidationErrorKind::MaxItems { size, limit },
            ));
        }
    }
    if let Some(limit) = object.get("minItems").and_then(Value::as_u64) {
        if (size as u64) < limit {
            return Err(ValidationError::new(
                path,
                ValidationErrorKind::MinItems { size, limit },
            ));
        }
    }

    if object.get("uniqueItems") == Some(&Value::Bool(true)) {
        let items = instance.as_array().unwrap();
        for i in 0..items.len() {
            for j in (i + 1)..items.len() {
                if deep_eq(&items[i], &items[j]) {
                    return Err(ValidationError::new(path, ValidationErrorKind::UniqueItems));
                }
            }
        }
    }

    match object.get("items") {
        None => Ok(()),
        Some(schema @ Value::Object(_)) => {
            let len = instance.as_array().unwrap().len();
            for index in 0..len {
                let child = instance.as_array_mut().unwrap().get_mut(index).unwrap();
                validate_schema(ctx, schema, child, &index_path(path, index))?;
            }
            Ok(())
        }
        Some(Value::Array(schemas)) => {
            let schemas = schemas.clone();
            let additional = object.get("additionalItems");
            let len = instance.as_array().unwrap().len();
            for index in 0..len {
                let child = instance.as_array_mut().unwrap().get_mut(index).unwrap();
                if let Some(schema) = schemas.get(index) {
                    validate_schema(ctx, schema, child, &index_path(path, index))?;
                } else {
                    match additional {
                        None | Some(Value::Bool(true)) => {}
                        Some(Value::Bool(false)) => {
                            return Err(ValidationError::new(
                                path,
                                ValidationErrorKind::AdditionalItems {
                                    limit: schemas.len(),
                                },
                            ));
                        }
                        Some(schema) => {
                            validate_schema(ctx, schema, child, &index_path(path, index))?;
                        }
                    }
                }
            }
            Ok(())
        }
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use serde_json::json;

    fn ctx(store: &Store) -> Context<'_> {
        Context {
            store,
            insert_defaults: false,
        }
    }

    #[test]
    fn tuple_items_validate_each_position() {
        let store = Store::new();
        let schema = json!({
            "items": [{"type": "integer"}, {"type": "string"}],
            "additionalItems": false
        });
        let mut ok = json!([1, "two"]);
        assert!(super::super::validate(&ctx(&store), &schema, &mut ok, "root").is_ok());

        let mut extra = json!([1, "two", 3]);
        let err =
            super::super::validate(&ctx(&store), &schema, &mut extra, "root").unwrap_err();
        assert!(matches!(
            err,
            _ if err.to_string().contains("additional")
        ));
    }

    #[test]
    fn additional_items_schema_validates_the_rest() {
        let store = Store::new();
        let schema = json!({
            "items": [{"type": "integer"}],
            "additionalItems": {"type": "string"}
        });
        let mut instance = json!([1, "a", "b"]);
        assert!(super::super::validate(&ctx(&store), &schema, &mut instance, "root").is_ok());

        let mut bad = json!([1, 2]);
        assert!(super::super::validate(&ctx(&store), &schema, &mut bad, "root").is_err());
    }

    #[test]
    fn list_form_items_applies_to_every_element() {
        let store = Store::new();
        let schema = json!({"items": {"type": "integer"}});
        let mut instance = json!([1, 2, 3]);
        assert!(super::super::validate(&ctx(&store), &schema, &mut instance, "root").is_ok());

        let mut bad = json!([1, "two"]);
        assert!(super::super::validate(&ctx(&store), &schema, &mut bad, "root").is_err());
    }

    #[test]
    fn unique_items_rejects_duplicates_including_numeric_equivalence() {
        let store = Store::new();
        let schema = json!({"uniqueItems": true});
        let mut instance = json!([1, 1.0]);
        assert!(super::super::validate(&ctx(&store), &schema, &mut instance, "root").is_err());
    }

    #[test]
    fn max_items_rejects_too_many() {
        let store = Store::new();
        let schema = json!({"maxItems": 2});
        let mut instance = json!([1, 2, 3]);
        assert!(super::super::validate(&ctx(&store), &schema, &mut instance, "root").is_err());
    }
}
