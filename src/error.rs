//! Diagnostics. Two error types, one per failure category: [`SchemaError`]
//! for ingestion-time structural failures, [`ValidationError`] for
//! validate-time failures (including unsupported-keyword refusals).
use crate::uri::UriError;
use serde_json::Value;
use std::fmt;

/// A failure while ingesting a schema document (resolver/loader).
#[derive(Debug, PartialEq, Eq)]
pub enum SchemaError {
    /// Two sub-schemas within the same ingestion resolved to the same URI.
    DuplicateSubschema(String),
    /// A `$ref` whose `base` matches the document being ingested has no
    /// matching sub-schema.
    MissingLocalReference(String),
    /// The URI a document was ingested under already has a binding.
    DuplicateUri(String),
    /// A `$ref` string, or the ingestion URI itself, could not be parsed.
    InvalidUri(String),
}

impl From<UriError> for SchemaError {
    fn from(err: UriError) -> Self {
        SchemaError::InvalidUri(err.to_string())
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::DuplicateSubschema(uri) => {
                write!(f, "duplicate sub-schema URI: {}", uri)
            }
            SchemaError::MissingLocalReference(uri) => {
                write!(f, "unresolved local reference: {}", uri)
            }
            SchemaError::DuplicateUri(uri) => {
                write!(f, "a schema is already bound to {}", uri)
            }
            SchemaError::InvalidUri(reference) => write!(f, "{}", reference),
        }
    }
}

impl std::error::Error for SchemaError {}

/// A failure while validating an instance against the resolved corpus.
/// Carries a path-qualified location, e.g. `root.users[3].age`.
#[derive(Debug, PartialEq)]
pub struct ValidationError {
    path: String,
    kind: ValidationErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ValidationErrorKind {
    /// No root schema has been installed yet.
    NoRootSchema,
    /// `$ref` points outside the corpus.
    UnresolvedReference(String),
    /// The schema uses a keyword the core deliberately doesn't implement.
    Unsupported(String),
    /// Instance type didn't match the schema's `type` keyword.
    Type { instance: Value, expected: Vec<String> },
    /// Instance isn't equal to any `enum` option.
    Enum { instance: Value, options: Value },
    MaxProperties { size: usize, limit: u64 },
    MinProperties { size: usize, limit: u64 },
    UnknownProperty(String),
    Required(String),
    DependencyRequired { depends_on: String, missing: String },
    MaxItems { size: usize, limit: u64 },
    MinItems { size: usize, limit: u64 },
    UniqueItems,
    AdditionalItems { limit: usize },
    MaxLength { length: usize, limit: u64 },
    MinLength { length: usize, limit: u64 },
    Maximum { instance: f64, limit: f64, exclusive: bool },
    Minimum { instance: f64, limit: f64, exclusive: bool },
    MultipleOf { instance: f64, multiple_of: f64 },
}

pub(crate) type ValidationResult = Result<(), ValidationError>;

impl ValidationError {
    pub(crate) fn new(path: &str, kind: ValidationErrorKind) -> Self {
        ValidationError {
            path: path.to_string(),
            kind,
        }
    }

    pub(crate) fn no_root_schema() -> Self {
        ValidationError::new("root", ValidationErrorKind::NoRootSchema)
    }

    pub(crate) fn unresolved_reference(path: &str, uri: String) -> Self {
        ValidationError::new(path, ValidationErrorKind::UnresolvedReference(uri))
    }

    pub(crate) fn unsupported(path: &str, keyword: &str) -> Self {
        ValidationError::new(path, ValidationErrorKind::Unsupported(keyword.to_string()))
    }

    /// The path-like name of the offending instance location, e.g.
    /// `root.users[3].age`.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValidationErrorKind::NoRootSchema => {
                write!(f, "{}: no root schema has been set", self.path)
            }
            ValidationErrorKind::UnresolvedReference(uri) => {
                write!(f, "{}: unresolved reference '{}'", self.path, uri)
            }
            ValidationErrorKind::Unsupported(keyword) => write!(
                f,
                "{}: '{}' is not implemented by this validator",
                self.path, keyword
            ),
            ValidationErrorKind::Type { instance, expected } => write!(
                f,
                "{}: '{}' is not of type {}",
                self.path,
                instance,
                format_expected(expected)
            ),
            ValidationErrorKind::Enum { instance, options } => write!(
                f,
                "{}: '{}' is not one of '{}'",
                self.path, instance, options
            ),
            ValidationErrorKind::MaxProperties { size, limit } => write!(
                f,
                "{}: object has {} properties, more than the maximum of {}",
                self.path, size, limit
            ),
            ValidationErrorKind::MinProperties { size, limit } => write!(
                f,
                "{}: object has {} properties, fewer than the minimum of {}",
                self.path, size, limit
            ),
            ValidationErrorKind::UnknownProperty(name) => {
                write!(f, "{}: unknown property '{}'", self.path, name)
            }
            ValidationErrorKind::Required(name) => {
                write!(f, "{}: '{}' is a required property", self.path, name)
            }
            ValidationErrorKind::DependencyRequired {
                depends_on,
                missing,
            } => write!(
                f,
                "{}: '{}' is required because '{}' is present",
                self.path, missing, depends_on
            ),
            ValidationErrorKind::MaxItems { size, limit } => write!(
                f,
                "{}: array has {} items, more than the maximum of {}",
                self.path, size, limit
            ),
            ValidationErrorKind::MinItems { size, limit } => write!(
                f,
                "{}: array has {} items, fewer than the minimum of {}",
                self.path, size, limit
            ),
            ValidationErrorKind::UniqueItems => {
                write!(f, "{}: array has non-unique elements", self.path)
            }
            ValidationErrorKind::AdditionalItems { limit } => write!(
                f,
                "{}: additional items are not allowed (beyond index {})",
                self.path, limit
            ),
            ValidationErrorKind::MaxLength { length, limit } => write!(
                f,
                "{}: string has length {}, longer than the maximum of {}",
                self.path, length, limit
            ),
            ValidationErrorKind::MinLength { length, limit } => write!(
                f,
                "{}: string has length {}, shorter than the minimum of {}",
                self.path, length, limit
            ),
            ValidationErrorKind::Maximum {
                instance,
                limit,
                exclusive,
            } => {
                if *exclusive {
                    write!(
                        f,
                        "{}: {} is greater than or equal to the exclusive maximum of {}",
                        self.path, instance, limit
                    )
                } else {
                    write!(
                        f,
                        "{}: {} is greater than the maximum of {}",
                        self.path, instance, limit
                    )
                }
            }
            ValidationErrorKind::Minimum {
                instance,
                limit,
                exclusive,
            } => {
                if *exclusive {
                    write!(
                        f,
                        "{}: {} is less than or equal to the exclusive minimum of {}",
                        self.path, instance, limit
                    )
                } else {
                    write!(
                        f,
                        "{}: {} is less than the minimum of {}",
                        self.path, instance, limit
                    )
                }
            }
            ValidationErrorKind::MultipleOf {
                instance,
                multiple_of,
            } => write!(
                f,
                "{}: {} is not a multiple of {}",
                self.path, instance, multiple_of
            ),
        }
    }
}

fn format_expected(expected: &[String]) -> String {
    if expected.len() == 1 {
        format!("'{}'", expected[0])
    } else {
        format!(
            "any of '{}'",
            expected
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ValidationError {}
