//! # schema_validator
//!
//! A crate for validating document trees against a declarative schema. It
//! ingests schema documents into a `Validator`, resolving `$ref` references
//! across one or more documents, then validates instances against the
//! resulting corpus with a recursive interpreter.
//!
//! Supports a Draft-4-shaped keyword set: `type`, `enum`, object/array/
//! string/number constraints, `$ref`, and optional default-value insertion.
//! Does not support `allOf`/`anyOf`/`oneOf`/`not`, string `format`/`pattern`,
//! or arbitrary-precision numerics; schemas using them are refused rather
//! than silently accepted.
//!
//! ## Example:
//!
//! ```rust
//! use schema_validator::Validator;
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let schema = json!({
//!         "type": "object",
//!         "properties": {"name": {"type": "string"}},
//!         "required": ["name"]
//!     });
//!     let mut validator = Validator::new();
//!     validator.set_root_schema(schema)?;
//!
//!     let mut instance = json!({"name": "Ferris"});
//!     validator.validate(&mut instance)?;
//!     Ok(())
//! }
//! ```
#![warn(
    clippy::doc_markdown,
    clippy::redundant_closure,
    clippy::explicit_iter_loop,
    clippy::match_same_arms,
    clippy::needless_borrow,
    clippy::print_stdout,
    clippy::cast_possible_truncation,
    clippy::trivially_copy_pass_by_ref,
    clippy::needless_pass_by_value,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    variant_size_differences
)]
mod error;
mod loader;
mod resolver;
mod store;
mod uri;
mod validate;

pub use error::{SchemaError, ValidationError};
pub use uri::SchemaUri;

use serde_json::Value;
use std::collections::BTreeSet;
use store::Store;

/// Owns a corpus of ingested schema documents and validates instances
/// against it.
#[derive(Debug, Default)]
pub struct Validator {
    store: Store,
    insert_defaults: bool,
}

impl Validator {
    /// An empty validator with no root schema set yet.
    #[must_use]
    pub fn new() -> Self {
        Validator {
            store: Store::new(),
            insert_defaults: false,
        }
    }

    /// Enable or disable inserting `default` values for missing object
    /// properties during validation. Disabled by default.
    pub fn enable_default_value_insertion(&mut self, enabled: bool) {
        self.insert_defaults = enabled;
    }

    /// Set the root schema. Fails if the schema references an external
    /// document not already present in the corpus.
    pub fn set_root_schema(&mut self, schema: Value) -> Result<(), SchemaError> {
        loader::set_root_schema(&mut self.store, schema)
    }

    /// Ingest a schema document under `uri`. Returns the set of external
    /// references still needed before the document (and anything already
    /// waiting on it) can be committed.
    pub fn insert_schema(
        &mut self,
        schema: Value,
        uri: &str,
    ) -> Result<BTreeSet<SchemaUri>, SchemaError> {
        loader::insert_schema(&mut self.store, schema, uri)
    }

    /// Validate `instance` against the root schema, mutating it in place
    /// when default-value insertion is enabled.
    pub fn validate(&self, instance: &mut Value) -> Result<(), ValidationError> {
        let root = match self.store.root_schema() {
            Some(root) => root,
            None => return Err(ValidationError::no_root_schema()),
        };
        let ctx = validate::Context {
            store: &self.store,
            insert_defaults: self.insert_defaults,
        };
        validate::validate(&ctx, root, instance, "$")
    }

    /// Shorthand for `validate(instance).is_ok()`.
    #[must_use]
    pub fn is_valid(&self, instance: &Value) -> bool {
        let mut instance = instance.clone();
        self.validate(&mut instance).is_ok()
    }
}

/// A shortcut for validating `instance` against `schema` with no default
/// insertion and no external references.
///
/// ```rust
/// use schema_validator::is_valid;
/// use serde_json::json;
///
/// let schema = json!({"maxLength": 5});
/// let instance = json!("foo");
/// assert!(is_valid(&schema, &instance));
/// ```
///
/// This function panics if `schema` is not a valid, fully self-contained
/// schema.
#[must_use]
pub fn is_valid(schema: &Value, instance: &Value) -> bool {
    let mut validator = Validator::new();
    validator
        .set_root_schema(schema.clone())
        .expect("Invalid schema");
    validator.is_valid(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn is_valid_shortcut_accepts_matching_instance() {
        let schema = json!({"minLength": 5});
        assert!(is_valid(&schema, &json!("foobar")));
        assert!(!is_valid(&schema, &json!("foo")));
    }

    #[test]
    fn validator_without_root_schema_reports_error() {
        let validator = Validator::new();
        let mut instance = json!(1);
        assert!(validator.validate(&mut instance).is_err());
    }

    #[test]
    fn default_value_insertion_can_be_toggled() {
        let mut validator = Validator::new();
        validator.enable_default_value_insertion(true);
        validator
            .set_root_schema(json!({
                "properties": {"count": {"type": "integer", "default": 0}}
            }))
            .unwrap();

        let mut instance = json!({});
        validator.validate(&mut instance).unwrap();
        assert_eq!(instance, json!({"count": 0}));
    }

    #[test]
    fn two_document_corpus_validates_through_external_reference() {
        let mut validator = Validator::new();
        let unresolved = validator
            .insert_schema(json!({"$ref": "http://example.com/address#"}), "#")
            .unwrap();
        assert_eq!(unresolved.len(), 1);

        validator
            .insert_schema(
                json!({"type": "object", "required": ["city"]}),
                "http://example.com/address#",
            )
            .unwrap();

        let unresolved = validator
            .insert_schema(json!({"$ref": "http://example.com/address#"}), "#")
            .unwrap();
        assert!(unresolved.is_empty());

        let mut instance = json!({"city": "Berlin"});
        assert!(validator.validate(&mut instance).is_ok());

        let mut bad = json!({});
        assert!(validator.validate(&mut bad).is_err());
    }
}
