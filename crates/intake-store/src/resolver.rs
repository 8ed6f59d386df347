//! Store resolver — find the configured store, or provision it.
//!
//! Lookup and creation are not one atomic step at the backend, so two
//! first-time requests could both see "absent". Within a process the
//! provisioning lock serializes them; across processes the backend's
//! create-if-not-exists fails for the loser, which then looks up the
//! winner's store instead of creating a second one.

use crate::{StoreBackend, StoreError, TableHandle};
use intake_core::TableLayout;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct StoreResolver {
    backend: Arc<dyn StoreBackend>,
    layout: TableLayout,
    provisioning: Mutex<()>,
}

impl StoreResolver {
    /// Resolver that provisions new stores with the canonical
    /// [`TableLayout::requests`] layout.
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self::with_layout(backend, TableLayout::requests())
    }

    pub fn with_layout(backend: Arc<dyn StoreBackend>, layout: TableLayout) -> Self {
        Self {
            backend,
            layout,
            provisioning: Mutex::new(()),
        }
    }

    /// Handle to the first table of the store named `name`, creating the
    /// store first if none exists.
    pub async fn resolve(&self, name: &str) -> Result<TableHandle, StoreError> {
        if let Some(table) = self.lookup(name).await? {
            return Ok(table);
        }

        let _guard = self.provisioning.lock().await;
        if let Some(table) = self.lookup(name).await? {
            return Ok(table);
        }

        match self.backend.create_store(name, &self.layout).await {
            Ok(table) => {
                tracing::info!(
                    store = %table.store,
                    table = %table.table,
                    store_name = name,
                    columns = self.layout.headers.len(),
                    "provisioned request store"
                );
                Ok(table)
            }
            Err(StoreError::AlreadyExists { .. }) => {
                tracing::debug!(store_name = name, "store created concurrently; looking it up");
                self.lookup(name)
                    .await?
                    .ok_or_else(|| StoreError::NameCollision {
                        name: name.to_string(),
                    })
            }
            Err(e) => Err(e),
        }
    }

    async fn lookup(&self, name: &str) -> Result<Option<TableHandle>, StoreError> {
        let Some(store) = self.backend.find_by_name(name).await? else {
            return Ok(None);
        };
        let table = self.backend.first_table(&store).await?;
        self.warn_on_drift(&table).await?;
        Ok(Some(table))
    }

    /// Appends are positional, so an existing table with different header
    /// names will receive misaligned data. Report it; a table of another
    /// width is left to `append_row`, which refuses every row.
    async fn warn_on_drift(&self, table: &TableHandle) -> Result<(), StoreError> {
        let existing = self.backend.layout(table).await?;
        if !self.layout.matches_headers(&existing.headers) {
            tracing::warn!(
                store = %table.store,
                table = %table.table,
                expected_columns = self.layout.headers.len(),
                actual_columns = existing.headers.len(),
                "request table header differs from the current schema; \
                 recreate the store to avoid misaligned columns"
            );
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
