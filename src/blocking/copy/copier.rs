use super::catalog::list_collections;
use super::collection::replicate_collection;
use super::store::{SourceDb, TargetDb};
use crate::config::FailurePolicy;
use crate::error::{report, CopyError, Result};
use tracing::{error, info};

/// Outcome of one copied collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    /// collection name.
    pub collection: String,
    /// documents inserted into the destination.
    pub transferred: u64,
    /// source document count, taken after the copy finished.
    pub source_count: u64,
}

/// Outcome of a whole database copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// copied collections, in copy order.
    pub collections: Vec<TransferResult>,
    /// collections which failed, only filled with [FailurePolicy::Continue].
    pub failed: Vec<String>,
}

impl CopyReport {
    /// total documents inserted into the destination.
    pub fn transferred(&self) -> u64 {
        self.collections.iter().map(|r| r.transferred).sum()
    }
}

/// Copies every non-system collection from one database into another.
///
/// Collections are handled one by one, in the order the source lists them.
pub struct DatabaseCopier<'a, S: ?Sized, T: ?Sized> {
    source: &'a S,
    target: &'a T,
    policy: FailurePolicy,
}

impl<'a, S, T> DatabaseCopier<'a, S, T>
where
    S: SourceDb + ?Sized,
    T: TargetDb + ?Sized,
{
    /// create a copier which aborts at the first failed collection.
    pub fn new(source: &'a S, target: &'a T) -> DatabaseCopier<'a, S, T> {
        DatabaseCopier {
            source,
            target,
            policy: FailurePolicy::default(),
        }
    }

    /// set what to do when a collection fails.
    pub fn on_error(mut self, policy: FailurePolicy) -> DatabaseCopier<'a, S, T> {
        self.policy = policy;
        self
    }

    /// run the copy.
    ///
    /// With [FailurePolicy::Abort] the first collection error is returned as it is.  With
    /// [FailurePolicy::Continue] failures are logged, and [CopyError::Incomplete] is returned
    /// after all collections are tried.
    pub fn copy_database(&self) -> Result<CopyReport> {
        let colls = list_collections(self.source)?;
        info!(
            src_db = self.source.name(),
            dst_db = self.target.name(),
            total = colls.len(),
            "begin to copy database"
        );

        let mut summary = CopyReport::default();
        for coll in colls.iter() {
            match self.copy_one(coll) {
                Ok(res) => summary.collections.push(res),
                Err(e) => match self.policy {
                    FailurePolicy::Abort => return Err(e),
                    FailurePolicy::Continue => {
                        error!(
                            coll = e.collection().unwrap_or(coll.as_str()),
                            transferred = e.transferred(),
                            error = %report(&e),
                            "collection copy failed, continue with next collection"
                        );
                        summary.failed.push(coll.clone());
                    }
                },
            }
        }

        if !summary.failed.is_empty() {
            return Err(CopyError::Incomplete {
                failed: summary.failed,
                total: colls.len(),
            });
        }
        Ok(summary)
    }

    fn copy_one(&self, coll: &str) -> Result<TransferResult> {
        let transferred = replicate_collection(self.source, self.target, coll)?;
        // The source may be written during the copy, so this count is only for the log.
        let source_count = self
            .source
            .count_documents(coll)
            .map_err(|e| CopyError::Count {
                coll: coll.to_string(),
                detail: e,
            })?;
        info!(
            "collection {} was copied (documents: {}/{})",
            coll, transferred, source_count
        );
        Ok(TransferResult {
            collection: coll.to_string(),
            transferred,
            source_count,
        })
    }
}
