//! Store error type.

use crate::StoreId;
use intake_core::schema::RowRejection;
use std::path::PathBuf;

/// Failure of a store lookup, provisioning step or append.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a store named {name:?} already exists")]
    AlreadyExists { name: String },

    #[error("cannot create store {name:?}: its location is taken by a store with another name")]
    NameCollision { name: String },

    #[error("store {0} not found")]
    NotFound(StoreId),

    #[error("store {0} has no tables")]
    NoTables(StoreId),

    #[error("table {table:?} not found in store {store}")]
    TableNotFound { store: StoreId, table: String },

    #[error("row {row} rejected: {reason}")]
    Rejected { row: u64, reason: RowRejection },

    #[error("store I/O failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unreadable store manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unreadable table file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
