use super::store::{DocumentStream, DropOutcome, SourceDb, TargetDb};
use crate::error::{StoreError, StoreResult};
use bson::{doc, Document};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::sync::{Collection, Database};
use mongodb::IndexModel;

/// server error code returned when a command targets a missing collection.
const NAMESPACE_NOT_FOUND: i32 = 26;
/// key only present in the reply of a drop which removed something.
const DROPPED_INDEXES_KEY: &str = "nIndexesWas";

/// Check if `err` is the server telling us the namespace doesn't exist.
pub fn is_namespace_not_found(err: &MongoError) -> bool {
    match *err.kind {
        ErrorKind::Command(ref cmd_err) => {
            cmd_err.code == NAMESPACE_NOT_FOUND || cmd_err.code_name == "NamespaceNotFound"
        }
        _ => false,
    }
}

/// Classify the server reply of a `drop` command.
///
/// Servers before 7.0 answer a missing namespace with a `NamespaceNotFound` error, newer ones
/// with a bare `{ok: 1}` which lacks `nIndexesWas`.  Dropping a view on 7.0+ gets the same bare
/// reply, so a dropped view is reported as [DropOutcome::NotFound] too.
pub fn drop_outcome(res: mongodb::error::Result<Document>) -> StoreResult<DropOutcome> {
    match res {
        Ok(reply) if reply.contains_key(DROPPED_INDEXES_KEY) => Ok(DropOutcome::Dropped),
        Ok(_) => Ok(DropOutcome::NotFound),
        Err(e) if is_namespace_not_found(&e) => Ok(DropOutcome::NotFound),
        Err(e) => Err(e.into()),
    }
}

/// Source database backed by mongodb.
#[derive(Clone, Debug)]
pub struct MongoSource {
    db: Database,
}

impl MongoSource {
    /// wrap a driver database handle.
    pub fn new(db: Database) -> MongoSource {
        MongoSource { db }
    }

    fn coll(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }
}

impl SourceDb for MongoSource {
    fn name(&self) -> &str {
        self.db.name()
    }

    fn collection_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.db.list_collection_names(None)?)
    }

    fn indexes(&self, coll: &str) -> StoreResult<Vec<IndexModel>> {
        let cursor = self.coll(coll).list_indexes(None)?;
        let mut indexes = vec![];
        for index in cursor {
            indexes.push(index?);
        }
        Ok(indexes)
    }

    fn documents(&self, coll: &str) -> StoreResult<DocumentStream<'_>> {
        let cursor = self.coll(coll).find(None, None)?;
        Ok(Box::new(cursor.map(|doc| doc.map_err(StoreError::from))))
    }

    fn count_documents(&self, coll: &str) -> StoreResult<u64> {
        Ok(self.coll(coll).count_documents(None, None)?)
    }
}

/// Destination database backed by mongodb.
#[derive(Clone, Debug)]
pub struct MongoTarget {
    db: Database,
}

impl MongoTarget {
    /// wrap a driver database handle.
    pub fn new(db: Database) -> MongoTarget {
        MongoTarget { db }
    }

    fn coll(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }
}

impl TargetDb for MongoTarget {
    fn name(&self) -> &str {
        self.db.name()
    }

    fn drop_collection(&self, coll: &str) -> StoreResult<DropOutcome> {
        // Run the raw command, `Collection::drop` hides the not found case from us.
        drop_outcome(self.db.run_command(doc! { "drop": coll }, None))
    }

    fn create_index(&self, coll: &str, index: IndexModel) -> StoreResult<()> {
        self.coll(coll).create_index(index, None)?;
        Ok(())
    }

    fn insert_document(&self, coll: &str, doc: Document) -> StoreResult<()> {
        self.coll(coll).insert_one(doc, None)?;
        Ok(())
    }
}
