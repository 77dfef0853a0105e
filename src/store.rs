//! Schema store: owns every ingested schema document and maps canonical
//! [`SchemaUri`]s to a node inside one of them.
use crate::uri::SchemaUri;
use serde_json::Value;
use std::collections::HashMap;

/// Where a bound URI's node lives: which owned document, and the JSON
/// Pointer string locating the node inside it.
///
/// Storing an index + pointer instead of a borrowed `&Value` sidesteps the
/// self-referential-struct problem a multi-document, append-only corpus
/// would otherwise hit: `Store` can grow (more documents ingested) without
/// invalidating bindings made against earlier documents.
#[derive(Debug, Clone)]
struct Binding {
    document: usize,
    pointer: String,
}

/// Owns the ingested schema documents plus the URI → node bindings
/// produced by resolving each of them.
#[derive(Debug, Default)]
pub struct Store {
    documents: Vec<Value>,
    bindings: HashMap<SchemaUri, Binding>,
    root: Option<SchemaUri>,
}

impl Store {
    pub fn new() -> Self {
        Store {
            documents: Vec::new(),
            bindings: HashMap::new(),
            root: None,
        }
    }

    /// `true` if some schema is already bound to `uri` (used for the
    /// ingestion collision check, and to tell an unresolved external
    /// reference from a now-satisfied one).
    pub fn contains(&self, uri: &SchemaUri) -> bool {
        self.bindings.contains_key(uri)
    }

    /// Resolve `uri` to the sub-schema node it's bound to, if any.
    pub fn get(&self, uri: &SchemaUri) -> Option<&Value> {
        let binding = self.bindings.get(uri)?;
        let document = self.documents.get(binding.document)?;
        if binding.pointer.is_empty() {
            Some(document)
        } else {
            document.pointer(&binding.pointer)
        }
    }

    /// Commit `document` to the store along with every `(uri, pointer)`
    /// binding the resolver produced for it. Sets the root if `root_uri` is
    /// the bare `#`. Caller must have already checked for collisions.
    pub(crate) fn commit(
        &mut self,
        document: Value,
        root_uri: &SchemaUri,
        bindings: Vec<(SchemaUri, String)>,
    ) {
        let index = self.documents.len();
        self.documents.push(document);
        for (uri, pointer) in bindings {
            self.bindings.insert(uri, Binding {
                document: index,
                pointer,
            });
        }
        if *root_uri == SchemaUri::root() {
            self.root = Some(root_uri.clone());
        }
    }

    /// The entry schema's URI, if one has been ingested under `#`.
    pub fn root(&self) -> Option<&SchemaUri> {
        self.root.as_ref()
    }

    /// The entry schema's node, if the root binding exists.
    pub fn root_schema(&self) -> Option<&Value> {
        let root = self.root.as_ref()?;
        self.get(root)
    }
}
