// File: src/error.rs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("cannot read node snapshot {path:?}: {source}")]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse node snapshot {path:?}: {source}")]
    SnapshotParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot watcher failed: {0}")]
    Watch(#[from] notify::Error),

    #[error("invalid peer address '{0}', expected host:port")]
    InvalidPeerAddress(String),
}
