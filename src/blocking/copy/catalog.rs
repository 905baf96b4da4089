use super::store::SourceDb;
use crate::error::{CopyError, Result};
use crate::SYSTEM_MARKER;

/// Check if `coll` is an internal collection which must not be copied.
pub fn is_system_collection(coll: &str) -> bool {
    coll.contains(SYSTEM_MARKER)
}

/// List collections of `source` which should be copied, in the order the server returns them.
pub fn list_collections<S: SourceDb + ?Sized>(source: &S) -> Result<Vec<String>> {
    let names = source
        .collection_names()
        .map_err(|e| CopyError::Enumeration {
            db: source.name().to_string(),
            detail: e,
        })?;
    Ok(names
        .into_iter()
        .filter(|name| !is_system_collection(name))
        .collect())
}
