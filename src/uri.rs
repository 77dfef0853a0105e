//! Schema identifiers: a `(base, pointer)` pair addressing one sub-schema
//! node inside a loaded schema document.
//!
//! `base` is an absolute URL-like string, or the empty string for the
//! default (anonymous) document. `pointer` is a sequence of already-escaped
//! JSON Pointer segments (`~0`/`~1` applied, no leading/trailing `/`).
use std::fmt;

/// A canonical schema identifier: an absolute base plus a fragment pointer.
///
/// Equality and ordering are structural on `(base, pointer)`, which makes
/// `SchemaUri` usable directly as a map key in the schema store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaUri {
    base: String,
    pointer: Vec<String>,
}

/// Failure to parse or resolve a schema identifier.
#[derive(Debug, PartialEq, Eq)]
pub enum UriError {
    /// The reference's non-fragment part isn't a valid URL, or couldn't be
    /// resolved against the current base.
    InvalidUrl(String),
}

impl fmt::Display for UriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UriError::InvalidUrl(reference) => write!(f, "invalid schema reference: {}", reference),
        }
    }
}

impl std::error::Error for UriError {}

impl SchemaUri {
    /// The identifier of the entry schema: empty base, empty pointer,
    /// canonical form `#`.
    pub fn root() -> Self {
        SchemaUri {
            base: String::new(),
            pointer: Vec::new(),
        }
    }

    /// Build a `SchemaUri` from an already-split base and pointer. Used by
    /// the resolver and store when reconstructing identifiers it already
    /// validated.
    pub(crate) fn new(base: String, pointer: Vec<String>) -> Self {
        SchemaUri { base, pointer }
    }

    /// Parse a caller-supplied identifier string (e.g. `"#"`,
    /// `"http://example.com/s#/definitions/a"`) as an absolute `SchemaUri`.
    pub fn parse(reference: &str) -> Result<Self, UriError> {
        SchemaUri::root().derive(reference)
    }

    /// Resolve `reference` against `self`, producing a new absolute URI.
    ///
    /// A reference of the form `#frag` (empty authority/path) keeps the
    /// current `base` and replaces only the fragment. Any other reference
    /// replaces both: its non-fragment part is resolved against the
    /// current base (or parsed as absolute, if the current base is empty)
    /// and its fragment (or `#`, if absent) becomes the new pointer.
    pub fn derive(&self, reference: &str) -> Result<Self, UriError> {
        let (head, frag) = match reference.find('#') {
            Some(idx) => (&reference[..idx], &reference[idx + 1..]),
            None => (reference, ""),
        };

        if head.is_empty() {
            return Ok(SchemaUri {
                base: self.base.clone(),
                pointer: parse_pointer(frag),
            });
        }

        let base = if self.base.is_empty() {
            url::Url::parse(head)
                .map_err(|_| UriError::InvalidUrl(reference.to_string()))?
        } else {
            let current = url::Url::parse(&self.base)
                .map_err(|_| UriError::InvalidUrl(self.base.clone()))?;
            current
                .join(head)
                .map_err(|_| UriError::InvalidUrl(reference.to_string()))?
        };
        Ok(SchemaUri {
            base: base.as_str().trim_end_matches('/').to_string(),
            pointer: parse_pointer(frag),
        })
    }

    /// Extend the pointer by one already-escaped segment.
    pub fn append(&self, segment: &str) -> Self {
        let mut pointer = self.pointer.clone();
        pointer.push(segment.to_string());
        SchemaUri {
            base: self.base.clone(),
            pointer,
        }
    }

    /// Escape an object key (or array index) into a single pointer segment.
    pub fn escape(key: &str) -> String {
        key.replace('~', "~0").replace('/', "~1")
    }

    /// The base URL, used to distinguish intra-document from cross-document
    /// references (two URIs are "in the same document" iff `url()` matches).
    pub fn url(&self) -> &str {
        &self.base
    }

    /// The pointer segments, in order.
    pub fn pointer(&self) -> &[String] {
        &self.pointer
    }

    /// A `/`-joined JSON Pointer string, suitable for `Value::pointer`.
    pub fn pointer_string(&self) -> String {
        if self.pointer.is_empty() {
            String::new()
        } else {
            format!("/{}", self.pointer.join("/"))
        }
    }
}

fn parse_pointer(frag: &str) -> Vec<String> {
    if frag.is_empty() {
        return Vec::new();
    }
    frag.split('/')
        .skip(1)
        .map(|segment| segment.to_string())
        .collect()
}

impl fmt::Display for SchemaUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.base, self.pointer_string())
    }
}
