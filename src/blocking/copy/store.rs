//! The two sides of a database copy.
//!
//! The copy algorithm only talks to these traits, [MongoSource](super::MongoSource) and
//! [MongoTarget](super::MongoTarget) implement them on top of the mongodb driver.
use crate::error::StoreResult;
use bson::Document;
use mongodb::IndexModel;

/// Lazy, forward only sequence of documents read from a source collection.
///
/// Dropping it closes the underlying cursor.
pub type DocumentStream<'a> = Box<dyn Iterator<Item = StoreResult<Document>> + 'a>;

/// Result of dropping a destination collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// the collection existed and is gone now.
    Dropped,
    /// there was nothing to drop.
    NotFound,
}

/// Read side of the copy.
pub trait SourceDb {
    /// database name.
    fn name(&self) -> &str;

    /// every collection name in the database, in server order.
    fn collection_names(&self) -> StoreResult<Vec<String>>;

    /// index definitions of collection `coll`, in server order.
    fn indexes(&self, coll: &str) -> StoreResult<Vec<IndexModel>>;

    /// all documents of collection `coll`.
    fn documents(&self, coll: &str) -> StoreResult<DocumentStream<'_>>;

    /// authoritative document count of collection `coll`.
    fn count_documents(&self, coll: &str) -> StoreResult<u64>;
}

/// Write side of the copy.
pub trait TargetDb {
    /// database name.
    fn name(&self) -> &str;

    /// drop collection `coll`, a missing collection is reported as [DropOutcome::NotFound].
    fn drop_collection(&self, coll: &str) -> StoreResult<DropOutcome>;

    /// create `index` on collection `coll`, an identical existing index is not an error.
    fn create_index(&self, coll: &str, index: IndexModel) -> StoreResult<()>;

    /// insert one document as it is.
    fn insert_document(&self, coll: &str, doc: Document) -> StoreResult<()>;
}
