/// provide mongo copy blocking apis.
mod connection;
#[doc(hidden)]
pub mod copy;

pub use connection::Connection;
pub use copy::{
    CopyReport, DatabaseCopier, DocumentStream, DropOutcome, MongoSource, MongoTarget, SourceDb,
    TargetDb, TransferResult,
};
