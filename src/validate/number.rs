//! Number validation, Draft-4 shaped: `exclusiveMaximum` and
//! `exclusiveMinimum` are booleans that modify the sibling `maximum`/
//! `minimum` keyword rather than numeric bounds of their own.
use super::Result;
use crate::error::{ValidationError, ValidationErrorKind};
use serde_json::{Map, Value};

pub(crate) fn validate(object: &Map<String, Value>, instance: &mut Value, path: &str) -> Result {
    let value = instance.as_f64().unwrap();

    if let Some(multiple_of) = object.get("multipleOf").and_then(Value::as_f64) {
        if value % multiple_of != 0.0 {
            return Err(ValidationError::new(
                path,
                ValidationErrorKind::MultipleOf {
                    instance: value,
                    multiple_of,
                },
            ));
        }
    }

    if let Some(limit) = object.get("maximum").and_then(Value::as_f64) {
        let exclusive = object.get("exclusiveMaximum") == Some(&Value::Bool(true));
        let violated = if exclusive {
            value >= limit
        } else {
            value > limit
        };
        if violated {
            return Err(ValidationError::new(
                path,
                ValidationErrorKind::Maximum {
                    instance: value,
                    limit,
                    exclusive,
                },
            ));
        }
    }

    if let Some(limit) = object.get("minimum").and_then(Value::as_f64) {
        let exclusive = object.get("exclusiveMinimum") == Some(&Value::Bool(true));
        let violated = if exclusive {
            value <= limit
        } else {
            value < limit
        };
        if violated {
            return Err(ValidationError::new(
                path,
                ValidationErrorKind::Minimum {
                    instance: value,
                    limit,
                    exclusive,
                },
            ));
        }
    }

    Ok(())
}
