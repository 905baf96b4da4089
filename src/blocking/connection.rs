use super::copy::{MongoSource, MongoTarget};
use crate::config::CopyConf;
use crate::error::{CopyError, Result, Side};
use mongodb::sync::{Client, Database};

#[derive(Clone, Debug)]
/// A simple abstraction for mongodb copy connection.
///
/// Holds the source and destination database handles, the underlying clients are released
/// when the connection is dropped.
pub struct Connection {
    inner: ConnectionInner,
}

impl Connection {
    /// create a new connection from given `config`.
    ///
    /// Each uri must contain the database name to copy from or to clear.
    pub fn new(config: &CopyConf) -> Result<Connection> {
        let source_db = open_database(Side::Source, config.get_src_uri())?;
        let target_db = open_database(Side::Destination, config.get_dst_uri())?;
        Ok(Connection {
            inner: ConnectionInner {
                source_db,
                target_db,
                config: config.clone(),
            },
        })
    }

    /// Check if both databases are reachable and we are allowed to list their collections.
    ///
    /// The driver connects lazily, so this is the first real round trip to the servers.
    pub fn check_permissions(&self) -> Result<()> {
        self.inner.check_permissions()
    }

    /// get database to copy from.
    pub fn source(&self) -> MongoSource {
        MongoSource::new(self.inner.source_db.clone())
    }

    /// get database to copy into.
    pub fn target(&self) -> MongoTarget {
        MongoTarget::new(self.inner.target_db.clone())
    }

    /// name of the database which will be cleared.
    pub fn target_db_name(&self) -> &str {
        self.inner.target_db.name()
    }
}

fn open_database(side: Side, uri: &str) -> Result<Database> {
    if uri.is_empty() {
        return Err(CopyError::EmptyUri { side });
    }
    let client = Client::with_uri_str(uri).map_err(|e| CopyError::Connection {
        side,
        uri: uri.to_string(),
        detail: e.into(),
    })?;
    client
        .default_database()
        .ok_or_else(|| CopyError::MissingDatabase {
            side,
            uri: uri.to_string(),
        })
}

#[derive(Clone, Debug)]
struct ConnectionInner {
    source_db: Database,
    target_db: Database,
    config: CopyConf,
}

impl ConnectionInner {
    pub fn check_permissions(&self) -> Result<()> {
        if let Err(e) = self.source_db.list_collection_names(None) {
            return Err(CopyError::Connection {
                side: Side::Source,
                uri: self.config.get_src_uri().to_string(),
                detail: e.into(),
            });
        }

        if let Err(e) = self.target_db.list_collection_names(None) {
            return Err(CopyError::Connection {
                side: Side::Destination,
                uri: self.config.get_dst_uri().to_string(),
                detail: e.into(),
            });
        }

        Ok(())
    }
}
