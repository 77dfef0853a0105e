//! String validation. `format` and `pattern` are refused outright rather
//! than silently ignored; only length bounds are actually enforced.
use super::{refuse_string_keywords, Result};
use crate::error::{ValidationError, ValidationErrorKind};
use serde_json::{Map, Value};

pub(crate) fn validate(object: &Map<String, Value>, instance: &mut Value, path: &str) -> Result {
    refuse_string_keywords(object, path)?;

    let length = instance.as_str().unwrap().chars().count();
    if let Some(limit) = object.get("maxLength").and_then(Value::as_u64) {
        if length as u64 > limit {
            return Err(ValidationError::new(
                path,
                ValidationErrorKind::MaxLength { length, limit },
            ));
        }
    }
    if let Some(limit) = object.get("minLength").and_then(Value::as_u64) {
        if (length as u64) < limit {
            return Err(ValidationError::new(
                path,
                ValidationErrorKind::MinLength { length, limit },
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_keyword_is_refused() {
        let schema = json!({"format": "email"});
        let object = schema.as_object().unwrap();
        let mut instance = json!("a@b.com");
        let err = validate(object, &mut instance, "root").unwrap_err();
        assert!(err.to_string().contains("format"));
    }

    #[test]
    fn pattern_keyword_is_refused() {
        let schema = json!({"pattern": "^a"});
        let object = schema.as_object().unwrap();
        let mut instance = json!("abc");
        let err = validate(object, &mut instance, "root").unwrap_err();
        assert!(err.to_string().contains("pattern"));
    }

    #[test]
    fn length_bounds_are_enforced_in_codepoints() {
        let schema = json!({"minLength": 2, "maxLength": 3});
        let object = schema.as_object().unwrap();

        let mut too_short = json!("a");
        assert!(validate(object, &mut too_short, "root").is_err());

        let mut ok = json!("ab");
        assert!(validate(object, &mut ok, "root").is_ok());

        let mut too_long = json!("abcd");
        assert!(validate(object, &mut too_long, "root").is_err());
    }
}
