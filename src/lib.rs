//! Mongo copy lib, which provides an easily usage api to copy a whole mongodb database into another one.
//!
//! For every collection in the source database (except internal `system` collections), the
//! destination collection is dropped, source indexes are created on it, and then all
//! documents are streamed across.
//!
//! The copy is a one-shot, best effort bulk copy: nothing is rolled back when a collection
//! fails.
//!
//! # Example:
//! ```no_run
//! use mongo_copy::{Connection, CopyConf, DatabaseCopier};
//!
//! let conf = CopyConf::new("mongodb://localhost:27017/shop".to_string(), "mongodb://localhost:27018/shop".to_string());
//! let conn = Connection::new(&conf).unwrap();
//! conn.check_permissions().unwrap();
//! let (source, target) = (conn.source(), conn.target());
//! let report = DatabaseCopier::new(&source, &target).copy_database().unwrap();
//! println!("{} documents copied", report.transferred());
//! ```

#![warn(missing_docs)]

#[doc(hidden)]
pub mod blocking;
mod config;
pub mod confirm;
mod error;

/// collections whose name contains this marker are internal and never copied.
const SYSTEM_MARKER: &str = "system";

pub use blocking::{
    Connection, CopyReport, DatabaseCopier, DocumentStream, DropOutcome, MongoSource, MongoTarget,
    SourceDb, TargetDb, TransferResult,
};
pub use config::{CopyConf, FailurePolicy};
pub use error::{report, CopyError, Result, Side, StoreError, StoreResult};
