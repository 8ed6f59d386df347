//! Appender — writes one normalized [`Record`] per call.
//!
//! No deduplication: appending the same record twice yields two rows.

use crate::{StoreBackend, StoreError, TableHandle};
use intake_core::Record;
use std::sync::Arc;

pub struct Appender {
    backend: Arc<dyn StoreBackend>,
}

impl Appender {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self { backend }
    }

    /// Append `record` after every existing row of `table` and return its
    /// 1-based row number.
    pub async fn append(&self, table: &TableHandle, record: &Record) -> Result<u64, StoreError> {
        let row = self
            .backend
            .append_row(table, record.cells().to_vec())
            .await?;
        tracing::info!(
            store = %table.store,
            table = %table.table,
            row,
            timestamp = %record.timestamp(),
            "appended request"
        );
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryBackend, StoreResolver};
    use chrono::{Duration, TimeZone, Utc};
    use intake_core::{normalize, Column, Submission};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn same_record_twice_makes_two_rows_in_order() {
        let backend = Arc::new(MemoryBackend::new());
        let table = StoreResolver::new(backend.clone()).resolve("shop").await.unwrap();
        let appender = Appender::new(backend.clone());

        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let first = normalize(&Submission::default(), t0);
        let second = normalize(&Submission::default(), t0 + Duration::seconds(1));

        assert_eq!(appender.append(&table, &first).await.unwrap(), 2);
        assert_eq!(appender.append(&table, &first).await.unwrap(), 3);
        assert_eq!(appender.append(&table, &second).await.unwrap(), 4);

        let rows = backend.read_rows(&table).await.unwrap();
        let ts = Column::Timestamp.index();
        assert_eq!(rows[1], rows[2]);
        assert!(rows[3][ts] > rows[2][ts]);
    }
}
