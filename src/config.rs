//! mongo_copy basic configuration, express in toml.
//!
//! Basic configuration file example:
//! ```toml
//! [src]
//! url = "mongodb://localhost:27017/shop"
//!
//! [dst]
//! url = "mongodb://localhost:27018/shop_copy"
//!
//! [copy]
//! # what to do when one collection fails: "abort" (default) or "continue".
//! on_error = "abort"
//! ```
//!
//! Both urls must contain a database name, it's the database to read from or to clear.
use crate::error::{CopyError, Result};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// How the copy reacts when one collection fails.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// stop the whole copy at the first failed collection.
    Abort,
    /// log the failure, copy the remaining collections, and fail at the end.
    Continue,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::Abort
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "abort" => Ok(FailurePolicy::Abort),
            "continue" => Ok(FailurePolicy::Continue),
            other => Err(format!(
                "unknown failure policy {:?}, expect `abort` or `continue`",
                other
            )),
        }
    }
}

/// Global database copy configuration.
#[derive(Deserialize, Debug, Clone)]
pub struct CopyConf {
    src: Src,
    dst: Dst,
    #[serde(default)]
    copy: DetailCopyConf,
}

impl CopyConf {
    /// create a configuration from source uri and destination uri, other values get default.
    pub fn new(src_uri: String, dst_uri: String) -> CopyConf {
        CopyConf {
            src: Src { url: src_uri },
            dst: Dst { url: dst_uri },
            copy: DetailCopyConf::default(),
        }
    }

    /// load configuration from a toml file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<CopyConf> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| CopyError::ConfigRead {
            path: path.display().to_string(),
            detail: e,
        })?;
        Ok(toml::from_slice(&data)?)
    }

    /// replace source uri.
    pub fn with_src_uri(mut self, uri: String) -> CopyConf {
        self.src.url = uri;
        self
    }

    /// replace destination uri.
    pub fn with_dst_uri(mut self, uri: String) -> CopyConf {
        self.dst.url = uri;
        self
    }

    /// replace failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> CopyConf {
        self.copy.on_error = policy;
        self
    }

    /// get source mongodb uri.
    pub fn get_src_uri(&self) -> &str {
        &self.src.url
    }

    /// get destination mongodb uri.
    pub fn get_dst_uri(&self) -> &str {
        &self.dst.url
    }

    /// get failure policy.
    pub fn get_failure_policy(&self) -> FailurePolicy {
        self.copy.on_error
    }
}

/// Source database configuration.
#[derive(Deserialize, Debug, Clone)]
pub struct Src {
    /// Source database url, begins with 'mongodb://' and ends with the database name.
    url: String,
}

/// Destination database configuration.
#[derive(Deserialize, Debug, Clone)]
pub struct Dst {
    /// Destination database url, every matching collection in it will be dropped.
    url: String,
}

/// Detail copy config.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct DetailCopyConf {
    #[serde(default)]
    on_error: FailurePolicy,
}
