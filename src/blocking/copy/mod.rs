#[doc(hidden)]
pub mod catalog;
#[doc(hidden)]
pub mod collection;
mod copier;
#[doc(hidden)]
pub mod mongo_helper;
mod store;

pub use copier::{CopyReport, DatabaseCopier, TransferResult};
pub use mongo_helper::{MongoSource, MongoTarget};
pub use store::{DocumentStream, DropOutcome, SourceDb, TargetDb};
