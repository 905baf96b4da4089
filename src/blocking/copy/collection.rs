use super::store::{DropOutcome, SourceDb, TargetDb};
use crate::error::{CopyError, Result};
use bson::Bson;
use mongodb::IndexModel;
use tracing::{debug, info};

/// Copy one collection from `source` to `target`, return how many documents are inserted.
///
/// Steps run in this order, and the first failure stops the collection:
/// 1. drop the destination collection, a missing collection is fine.
/// 2. create every source index on the destination, in source order.
/// 3. stream source documents and insert them one by one.
///
/// Nothing is rolled back: when an insert fails, documents inserted before it stay in the
/// destination, and the returned error carries their count.
pub fn replicate_collection<S, T>(source: &S, target: &T, coll: &str) -> Result<u64>
where
    S: SourceDb + ?Sized,
    T: TargetDb + ?Sized,
{
    info!(%coll, "dropping collection");
    match target.drop_collection(coll) {
        Ok(DropOutcome::Dropped) => debug!(%coll, "destination collection dropped"),
        Ok(DropOutcome::NotFound) => {
            debug!(%coll, "destination collection not found, nothing to drop")
        }
        Err(e) => {
            return Err(CopyError::Drop {
                coll: coll.to_string(),
                detail: e,
            })
        }
    }

    replicate_indexes(source, target, coll)?;
    copy_documents(source, target, coll)
}

fn replicate_indexes<S, T>(source: &S, target: &T, coll: &str) -> Result<()>
where
    S: SourceDb + ?Sized,
    T: TargetDb + ?Sized,
{
    let indexes = source.indexes(coll).map_err(|e| CopyError::IndexList {
        coll: coll.to_string(),
        detail: e,
    })?;
    info!(%coll, count = indexes.len(), "setting indexes for a collection");

    for index in indexes {
        let index_name = index_identifier(&index);
        target
            .create_index(coll, index)
            .map_err(|e| CopyError::IndexReplication {
                coll: coll.to_string(),
                index: index_name.clone(),
                detail: e,
            })?;
        debug!(%coll, index = %index_name, "index created");
    }
    Ok(())
}

fn copy_documents<S, T>(source: &S, target: &T, coll: &str) -> Result<u64>
where
    S: SourceDb + ?Sized,
    T: TargetDb + ?Sized,
{
    info!(%coll, "insert documents into the destination collection");
    let cursor = source.documents(coll).map_err(|e| CopyError::Read {
        coll: coll.to_string(),
        transferred: 0,
        detail: e,
    })?;

    let mut transferred = 0;
    // returning early drops `cursor`, which closes it.
    for doc in cursor {
        let doc = doc.map_err(|e| CopyError::Read {
            coll: coll.to_string(),
            transferred,
            detail: e,
        })?;
        target
            .insert_document(coll, doc)
            .map_err(|e| CopyError::Insert {
                coll: coll.to_string(),
                transferred,
                detail: e,
            })?;
        transferred += 1;
    }
    Ok(transferred)
}

/// Name used to report `index`.
///
/// Listed indexes always have a name, for the others fall back to the server's default
/// naming scheme, like `a_1_b_-1`.
pub fn index_identifier(index: &IndexModel) -> String {
    if let Some(name) = index.options.as_ref().and_then(|opts| opts.name.as_ref()) {
        return name.clone();
    }
    index
        .keys
        .iter()
        .map(|(field, direction)| {
            let direction = match direction {
                Bson::Int32(v) => v.to_string(),
                Bson::Int64(v) => v.to_string(),
                Bson::Double(v) if v.fract() == 0.0 => (*v as i64).to_string(),
                Bson::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{}_{}", field, direction)
        })
        .collect::<Vec<_>>()
        .join("_")
}
