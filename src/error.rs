use mongodb::error::Error as MongoError;
use std::fmt;
use std::result::Result as StdResult;
use thiserror::Error;

/// Which end of the copy an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// the database documents are read from.
    Source,
    /// the database which gets cleared and filled.
    Destination,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Destination => f.write_str("destination"),
        }
    }
}

/// Failure reported by a document store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// error from the mongodb driver.
    #[error(transparent)]
    Mongo(#[from] MongoError),
    /// error from a backend which is not the mongodb driver.
    #[error("{0}")]
    Custom(String),
}

/// Result type of store level operations.
pub type StoreResult<T> = StdResult<T, StoreError>;

/// Everything which can go wrong while copying a database.
#[derive(Error, Debug)]
pub enum CopyError {
    /// a connection string is empty.
    #[error("{side} database uri is empty")]
    EmptyUri {
        /// which uri.
        side: Side,
    },
    /// a connection string doesn't name the database to use.
    #[error("{side} connection string {uri:?} doesn't contain a database name")]
    MissingDatabase {
        /// which uri.
        side: Side,
        /// the connection string.
        uri: String,
    },
    /// a server can't be reached, or the uri is invalid.
    #[error("failed to connect to the {side} database {uri}")]
    Connection {
        /// which server.
        side: Side,
        /// the connection string.
        uri: String,
        /// underlying failure.
        #[source]
        detail: StoreError,
    },
    /// listing source collections failed.
    #[error("failed to list collections of database {db}")]
    Enumeration {
        /// source database name.
        db: String,
        /// underlying failure.
        #[source]
        detail: StoreError,
    },
    /// dropping a destination collection failed, a missing collection is not an error.
    #[error("collection drop error {coll}")]
    Drop {
        /// collection name.
        coll: String,
        /// underlying failure.
        #[source]
        detail: StoreError,
    },
    /// reading source indexes failed.
    #[error("error getting index list for collection {coll}")]
    IndexList {
        /// collection name.
        coll: String,
        /// underlying failure.
        #[source]
        detail: StoreError,
    },
    /// creating a destination index failed.
    #[error("error creating index {index} for collection {coll}")]
    IndexReplication {
        /// collection name.
        coll: String,
        /// index name.
        index: String,
        /// underlying failure.
        #[source]
        detail: StoreError,
    },
    /// the source cursor failed in the middle of a collection.
    #[error("error reading documents from collection {coll} ({transferred} documents copied)")]
    Read {
        /// collection name.
        coll: String,
        /// documents inserted before the failure.
        transferred: u64,
        /// underlying failure.
        #[source]
        detail: StoreError,
    },
    /// a destination insert failed, earlier inserts are kept.
    #[error("error inserting document into collection {coll} ({transferred} documents copied)")]
    Insert {
        /// collection name.
        coll: String,
        /// documents inserted before the failure.
        transferred: u64,
        /// underlying failure.
        #[source]
        detail: StoreError,
    },
    /// counting source documents after the copy failed.
    #[error("error counting documents of collection {coll}")]
    Count {
        /// collection name.
        coll: String,
        /// underlying failure.
        #[source]
        detail: StoreError,
    },
    /// some collections failed while the copy continued on errors.
    #[error("{} of {total} collections failed to copy: {failed:?}", .failed.len())]
    Incomplete {
        /// failed collections, in copy order.
        failed: Vec<String>,
        /// collections the copy tried.
        total: usize,
    },
    /// configuration file can't be read.
    #[error("failed to read configuration file {path}")]
    ConfigRead {
        /// configuration file path.
        path: String,
        /// underlying failure.
        #[source]
        detail: std::io::Error,
    },
    /// configuration file is not valid toml for [CopyConf](crate::CopyConf).
    #[error("invalid configuration file")]
    ConfigParse(#[from] toml::de::Error),
}

impl CopyError {
    /// Documents which were inserted into the destination collection before this error happened.
    ///
    /// Errors raised before the document stream started always report 0.
    pub fn transferred(&self) -> u64 {
        match self {
            CopyError::Read { transferred, .. } | CopyError::Insert { transferred, .. } => {
                *transferred
            }
            _ => 0,
        }
    }

    /// The collection this error is bound to, if any.
    pub fn collection(&self) -> Option<&str> {
        match self {
            CopyError::Drop { coll, .. }
            | CopyError::IndexList { coll, .. }
            | CopyError::IndexReplication { coll, .. }
            | CopyError::Read { coll, .. }
            | CopyError::Insert { coll, .. }
            | CopyError::Count { coll, .. } => Some(coll),
            _ => None,
        }
    }
}

/// Result type of copy operations.
pub type Result<T> = StdResult<T, CopyError>;

/// Render `err` and all of its causes in one line, outermost first.
pub fn report(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(e) = cause {
        message.push_str(": ");
        message.push_str(&e.to_string());
        cause = e.source();
    }
    message
}
