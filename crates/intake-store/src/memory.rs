//! In-memory [`StoreBackend`] for development and tests.

use crate::{report_advisory, StoreBackend, StoreError, StoreId, TableHandle};
use async_trait::async_trait;
use intake_core::TableLayout;
use tokio::sync::Mutex;

#[derive(Default)]
struct State {
    /// Stores in creation order; lookups return the earliest match.
    stores: Vec<MemoryStore>,
    next_id: u64,
}

struct MemoryStore {
    id: StoreId,
    name: String,
    tables: Vec<MemoryTable>,
}

struct MemoryTable {
    layout: TableLayout,
    /// Header row first.
    rows: Vec<Vec<String>>,
}

/// Process-local store backend. Contents vanish with the process.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a store unconditionally, bypassing the name check of
    /// [`StoreBackend::create_store`]. `rows` should start with the header.
    ///
    /// Lets callers reproduce states the pipeline never creates itself, such
    /// as two stores sharing a name or a table with an outdated header.
    pub async fn insert_store(
        &self,
        name: &str,
        layout: TableLayout,
        rows: Vec<Vec<String>>,
    ) -> TableHandle {
        let mut state = self.state.lock().await;
        let id = allocate_id(&mut state);
        let handle = TableHandle {
            store: id.clone(),
            table: layout.table_name.clone(),
        };
        state.stores.push(MemoryStore {
            id,
            name: name.to_string(),
            tables: vec![MemoryTable { layout, rows }],
        });
        handle
    }

    /// Number of stores named `name`.
    pub async fn count_named(&self, name: &str) -> usize {
        let state = self.state.lock().await;
        state.stores.iter().filter(|s| s.name == name).count()
    }
}

fn allocate_id(state: &mut State) -> StoreId {
    state.next_id += 1;
    StoreId(format!("mem-{}", state.next_id))
}

fn table_mut<'a>(
    state: &'a mut State,
    handle: &TableHandle,
) -> Result<&'a mut MemoryTable, StoreError> {
    let store = state
        .stores
        .iter_mut()
        .find(|s| s.id == handle.store)
        .ok_or_else(|| StoreError::NotFound(handle.store.clone()))?;
    store
        .tables
        .iter_mut()
        .find(|t| t.layout.table_name == handle.table)
        .ok_or_else(|| StoreError::TableNotFound {
            store: handle.store.clone(),
            table: handle.table.clone(),
        })
}

#[async_trait]
impl StoreBackend for MemoryBackend {
    async fn find_by_name(&self, name: &str) -> Result<Option<StoreId>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .stores
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.id.clone()))
    }

    async fn first_table(&self, store: &StoreId) -> Result<TableHandle, StoreError> {
        let state = self.state.lock().await;
        let found = state
            .stores
            .iter()
            .find(|s| &s.id == store)
            .ok_or_else(|| StoreError::NotFound(store.clone()))?;
        let table = found
            .tables
            .first()
            .ok_or_else(|| StoreError::NoTables(store.clone()))?;
        Ok(TableHandle {
            store: store.clone(),
            table: table.layout.table_name.clone(),
        })
    }

    async fn create_store(
        &self,
        name: &str,
        layout: &TableLayout,
    ) -> Result<TableHandle, StoreError> {
        let mut state = self.state.lock().await;
        if state.stores.iter().any(|s| s.name == name) {
            return Err(StoreError::AlreadyExists {
                name: name.to_string(),
            });
        }
        let id = allocate_id(&mut state);
        state.stores.push(MemoryStore {
            id: id.clone(),
            name: name.to_string(),
            tables: vec![MemoryTable {
                layout: layout.clone(),
                rows: vec![layout.headers.clone()],
            }],
        });
        Ok(TableHandle {
            store: id,
            table: layout.table_name.clone(),
        })
    }

    async fn append_row(&self, table: &TableHandle, cells: Vec<String>) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        let target = table_mut(&mut state, table)?;
        let row = target.rows.len() as u64 + 1;
        let advisory = target
            .layout
            .check_row(row, &cells)
            .map_err(|reason| StoreError::Rejected { row, reason })?;
        report_advisory(table, &advisory);
        target.rows.push(cells);
        Ok(row)
    }

    async fn read_rows(&self, table: &TableHandle) -> Result<Vec<Vec<String>>, StoreError> {
        let mut state = self.state.lock().await;
        Ok(table_mut(&mut state, table)?.rows.clone())
    }

    async fn layout(&self, table: &TableHandle) -> Result<TableLayout, StoreError> {
        let mut state = self.state.lock().await;
        Ok(table_mut(&mut state, table)?.layout.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
