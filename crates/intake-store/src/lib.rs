//! intake-store — persistence of request records.
//!
//! A *store* is a named resource holding one or more tables; records go to
//! the first table of the store whose name matches the configured one. The
//! [`StoreBackend`] trait is the seam between the pipeline and whatever holds
//! the data:
//!
//! - [`DirectoryBackend`] keeps each store as a directory with a JSON
//!   manifest and one CSV file per table.
//! - [`MemoryBackend`] keeps everything in process memory.
//!
//! [`StoreResolver`] implements find-or-create on top of a backend and
//! [`Appender`] writes normalized records.

use async_trait::async_trait;
use intake_core::TableLayout;

pub mod appender;
pub mod directory;
pub mod error;
pub mod memory;
pub mod resolver;

pub use appender::Appender;
pub use directory::DirectoryBackend;
pub use error::StoreError;
pub use memory::MemoryBackend;
pub use resolver::StoreResolver;

/// Backend-assigned identity of a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreId(pub String);

impl std::fmt::Display for StoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to one table of one store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHandle {
    pub store: StoreId,
    pub table: String,
}

/// Storage operations the pipeline needs.
///
/// Row numbers are 1-based and count the header row, so the first record
/// appended to a fresh table is row 2.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// First store whose name equals `name` exactly. When several match, the
    /// backend's enumeration order decides.
    async fn find_by_name(&self, name: &str) -> Result<Option<StoreId>, StoreError>;

    async fn first_table(&self, store: &StoreId) -> Result<TableHandle, StoreError>;

    /// Atomically create a store holding one table provisioned from
    /// `layout`. Fails with [`StoreError::AlreadyExists`] if the name is
    /// already taken.
    async fn create_store(&self, name: &str, layout: &TableLayout)
        -> Result<TableHandle, StoreError>;

    /// Append one row after every existing row. Returns its row number.
    async fn append_row(&self, table: &TableHandle, cells: Vec<String>) -> Result<u64, StoreError>;

    /// Every row of the table, header included.
    async fn read_rows(&self, table: &TableHandle) -> Result<Vec<Vec<String>>, StoreError>;

    /// Layout the table was provisioned with.
    async fn layout(&self, table: &TableHandle) -> Result<TableLayout, StoreError>;
}

/// Log advisory validation results for a row that is about to be written.
pub(crate) fn report_advisory(table: &TableHandle, advisory: &[intake_core::schema::Violation]) {
    for violation in advisory {
        tracing::warn!(
            store = %table.store,
            table = %table.table,
            row = violation.row,
            column = %violation.column,
            value = %violation.value,
            "value outside the suggested list"
        );
    }
}
