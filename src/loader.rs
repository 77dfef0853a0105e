//! Loader loop: the public ingestion contract. Each call resolves a
//! private copy of the given tree and either commits it (no unresolved
//! externals, no collisions) or hands the unresolved set back to the
//! caller without touching the store.
use crate::error::SchemaError;
use crate::resolver;
use crate::store::Store;
use crate::uri::SchemaUri;
use serde_json::Value;
use std::collections::BTreeSet;

/// Ingest `schema` under `uri`. Returns the set of external references the
/// caller still needs to supply (empty means the document was committed).
/// Performs no I/O; fixed-point termination across repeated calls is the
/// caller's responsibility.
pub fn insert_schema(
    store: &mut Store,
    schema: Value,
    uri: &str,
) -> Result<BTreeSet<SchemaUri>, SchemaError> {
    let root_uri = SchemaUri::parse(uri)?;
    let mut working_tree = schema;
    let resolution = resolver::resolve(&root_uri, &mut working_tree)?;

    let unresolved: BTreeSet<SchemaUri> = resolution
        .external
        .into_iter()
        .filter(|reference| !store.contains(reference))
        .collect();
    if !unresolved.is_empty() {
        return Ok(unresolved);
    }

    if let Some((uri, _)) = resolution
        .bindings
        .iter()
        .find(|(uri, _)| store.contains(uri))
    {
        return Err(SchemaError::DuplicateUri(uri.to_string()));
    }

    store.commit(working_tree, &root_uri, resolution.bindings);
    Ok(BTreeSet::new())
}

/// Convenience entry equivalent to `insert_schema(schema, "#")` that
/// requires the schema to be fully self-contained: any unresolved external
/// reference is raised as an error rather than returned as data.
pub fn set_root_schema(store: &mut Store, schema: Value) -> Result<(), SchemaError> {
    let unresolved = insert_schema(store, schema, "#")?;
    if let Some(reference) = unresolved.into_iter().next() {
        return Err(SchemaError::MissingLocalReference(reference.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_root_schema_with_no_refs_succeeds() {
        let mut store = Store::new();
        set_root_schema(&mut store, json!({"type": "object"})).unwrap();
        assert!(store.root().is_some());
    }

    #[test]
    fn set_root_schema_raises_on_unresolved_external() {
        let mut store = Store::new();
        let err = set_root_schema(&mut store, json!({"$ref": "http://other/s2#"})).unwrap_err();
        assert!(matches!(err, SchemaError::MissingLocalReference(_)));
    }

    #[test]
    fn insert_schema_returns_external_refs_without_mutating_store() {
        let mut store = Store::new();
        let unresolved =
            insert_schema(&mut store, json!({"$ref": "http://other/s2#"}), "#").unwrap();
        assert_eq!(unresolved.len(), 1);
        assert!(store.root().is_none());
    }

    #[test]
    fn two_step_ingestion_closes_the_loop() {
        let mut store = Store::new();
        let s1 = json!({"$ref": "http://other/s2#"});
        let unresolved = insert_schema(&mut store, s1, "#").unwrap();
        assert_eq!(unresolved.len(), 1);

        let s2 = json!({"type": "string"});
        let unresolved2 =
            insert_schema(&mut store, s2, "http://other/s2#").unwrap();
        assert!(unresolved2.is_empty());

        // Root still isn't committed until we retry it.
        assert!(store.root().is_none());
        let s1_again = json!({"$ref": "http://other/s2#"});
        let unresolved3 = insert_schema(&mut store, s1_again, "#").unwrap();
        assert!(unresolved3.is_empty());
        assert!(store.root().is_some());
    }

    #[test]
    fn duplicate_ingestion_under_same_uri_fails_atomically() {
        let mut store = Store::new();
        set_root_schema(&mut store, json!({"type": "object"})).unwrap();
        let err = insert_schema(&mut store, json!({"type": "string"}), "#").unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateUri(_)));
    }
}
