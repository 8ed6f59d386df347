//! Directory-backed [`StoreBackend`].
//!
//! Layout on disk:
//!
//! ```text
//! <root>/
//!   desi-arms-customer-requests/     one directory per store (slug of its name)
//!     manifest.json                  store name, creation time, table layouts
//!     requests.csv                   header row + one line per record
//! ```
//!
//! A new store is assembled in a hidden `.staging-*` directory and renamed to
//! its slug as the last step, so a store directory always carries its
//! manifest. The rename fails when the slug is taken; that is the atomic
//! create-if-not-exists primitive the resolver relies on. A slug directory
//! without a manifest can only be debris (an interrupted run of an older
//! layout, or a hand-made directory) and is moved aside on the next create.

use crate::{report_advisory, StoreBackend, StoreError, StoreId, TableHandle};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use intake_core::TableLayout;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const MANIFEST_FILE: &str = "manifest.json";
const STAGING_PREFIX: &str = ".staging-";
const ABANDONED_PREFIX: &str = ".abandoned-";

static SCRATCH_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    name: String,
    created_at: DateTime<Utc>,
    tables: Vec<TableEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TableEntry {
    /// CSV file name, relative to the store directory.
    file: String,
    layout: TableLayout,
}

/// Stores kept as directories of CSV files under one root.
pub struct DirectoryBackend {
    root: PathBuf,
    /// Row count (header included) of each CSV file appended to, read from
    /// disk on first use. Holding the lock serializes appends, so this
    /// process must be the only writer of the root.
    row_counts: Mutex<HashMap<PathBuf, u64>>,
}

impl DirectoryBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            row_counts: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn store_dir(&self, store: &StoreId) -> PathBuf {
        self.root.join(&store.0)
    }

    async fn read_manifest(&self, store: &StoreId) -> Result<Manifest, StoreError> {
        let path = self.store_dir(store).join(MANIFEST_FILE);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(store.clone()))
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Manifest { path, source })
    }

    async fn table_entry(&self, table: &TableHandle) -> Result<TableEntry, StoreError> {
        let manifest = self.read_manifest(&table.store).await?;
        manifest
            .tables
            .into_iter()
            .find(|t| t.layout.table_name == table.table)
            .ok_or_else(|| StoreError::TableNotFound {
                store: table.store.clone(),
                table: table.table.clone(),
            })
    }

    /// A fresh hidden path under the root, unique across processes.
    fn scratch_path(&self, prefix: &str, id: &StoreId) -> PathBuf {
        let seq = SCRATCH_SEQ.fetch_add(1, Ordering::Relaxed);
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        self.root
            .join(format!("{prefix}{id}-{}-{nanos}-{seq}", std::process::id()))
    }

    /// Move the staged store to `target`. Fails with `AlreadyExists` when a
    /// store with a manifest is already there.
    async fn publish(
        &self,
        staging: &Path,
        target: &Path,
        id: &StoreId,
        name: &str,
    ) -> Result<(), StoreError> {
        let err = match tokio::fs::rename(staging, target).await {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        if !exists(target).await? {
            return Err(StoreError::io(target, err));
        }
        if exists(&target.join(MANIFEST_FILE)).await? {
            return Err(StoreError::AlreadyExists {
                name: name.to_string(),
            });
        }

        let aside = self.scratch_path(ABANDONED_PREFIX, id);
        tracing::warn!(
            dir = %target.display(),
            moved_to = %aside.display(),
            "store directory has no manifest; moving it aside"
        );
        match tokio::fs::rename(target, &aside).await {
            Ok(()) => {}
            // Someone else cleared it first.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io(target, e)),
        }

        let err = match tokio::fs::rename(staging, target).await {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        if exists(&target.join(MANIFEST_FILE)).await? {
            return Err(StoreError::AlreadyExists {
                name: name.to_string(),
            });
        }
        Err(StoreError::io(target, err))
    }

    async fn provision(
        &self,
        dir: &Path,
        name: &str,
        layout: &TableLayout,
    ) -> Result<String, StoreError> {
        let file = format!("{}.csv", slug(&layout.table_name));
        let header = encode_row(&layout.headers).map_err(|source| StoreError::Csv {
            path: dir.join(&file),
            source,
        })?;
        let csv_path = dir.join(&file);
        tokio::fs::write(&csv_path, header)
            .await
            .map_err(|e| StoreError::io(&csv_path, e))?;

        let manifest = Manifest {
            name: name.to_string(),
            created_at: Utc::now(),
            tables: vec![TableEntry {
                file: file.clone(),
                layout: layout.clone(),
            }],
        };
        let manifest_path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_vec_pretty(&manifest).map_err(|source| StoreError::Manifest {
            path: manifest_path.clone(),
            source,
        })?;
        tokio::fs::write(&manifest_path, json)
            .await
            .map_err(|e| StoreError::io(&manifest_path, e))?;
        Ok(file)
    }
}

#[async_trait]
impl StoreBackend for DirectoryBackend {
    async fn find_by_name(&self, name: &str) -> Result<Option<StoreId>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&self.root, e)),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&self.root, e))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map_err(|e| StoreError::io(entry.path(), e))?
                .is_dir();
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if is_dir && !hidden {
                ids.push(StoreId(entry.file_name().to_string_lossy().into_owned()));
            }
        }
        ids.sort_by(|a, b| a.0.cmp(&b.0));

        for id in ids {
            match self.read_manifest(&id).await {
                Ok(manifest) if manifest.name == name => return Ok(Some(id)),
                Ok(_) => {}
                Err(StoreError::NotFound(_)) => {
                    tracing::debug!(store = %id, "skipping store directory without manifest");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    async fn first_table(&self, store: &StoreId) -> Result<TableHandle, StoreError> {
        let manifest = self.read_manifest(store).await?;
        let first = manifest
            .tables
            .first()
            .ok_or_else(|| StoreError::NoTables(store.clone()))?;
        Ok(TableHandle {
            store: store.clone(),
            table: first.layout.table_name.clone(),
        })
    }

    async fn create_store(
        &self,
        name: &str,
        layout: &TableLayout,
    ) -> Result<TableHandle, StoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::io(&self.root, e))?;

        let id = StoreId(slug(name));
        let target = self.store_dir(&id);
        if exists(&target.join(MANIFEST_FILE)).await? {
            return Err(StoreError::AlreadyExists {
                name: name.to_string(),
            });
        }

        let staging = self.scratch_path(STAGING_PREFIX, &id);
        tokio::fs::create_dir(&staging)
            .await
            .map_err(|e| StoreError::io(&staging, e))?;

        let published = match self.provision(&staging, name, layout).await {
            Ok(_) => self.publish(&staging, &target, &id, name).await,
            Err(e) => Err(e),
        };
        if let Err(e) = published {
            if let Err(cleanup) = tokio::fs::remove_dir_all(&staging).await {
                tracing::warn!(
                    dir = %staging.display(),
                    error = %cleanup,
                    "failed to remove staged store"
                );
            }
            return Err(e);
        }

        Ok(TableHandle {
            store: id,
            table: layout.table_name.clone(),
        })
    }

    async fn append_row(&self, table: &TableHandle, cells: Vec<String>) -> Result<u64, StoreError> {
        let mut row_counts = self.row_counts.lock().await;

        let entry = self.table_entry(table).await?;
        let path = self.store_dir(&table.store).join(&entry.file);
        let existing = match row_counts.get(&path) {
            Some(count) => *count,
            None => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|e| StoreError::io(&path, e))?;
                count_rows(&bytes).map_err(|source| StoreError::Csv {
                    path: path.clone(),
                    source,
                })?
            }
        };
        let row = existing + 1;

        let advisory = entry
            .layout
            .check_row(row, &cells)
            .map_err(|reason| StoreError::Rejected { row, reason })?;
        report_advisory(table, &advisory);

        let line = encode_row(&cells).map_err(|source| StoreError::Csv {
            path: path.clone(),
            source,
        })?;
        if let Err(e) = append_line(&path, &line).await {
            // A partial write leaves the count unknown; recount next time.
            row_counts.remove(&path);
            return Err(StoreError::io(&path, e));
        }
        row_counts.insert(path, row);

        Ok(row)
    }

    async fn read_rows(&self, table: &TableHandle) -> Result<Vec<Vec<String>>, StoreError> {
        let entry = self.table_entry(table).await?;
        let path = self.store_dir(&table.store).join(&entry.file);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| StoreError::io(&path, e))?;

        let mut reader = csv_reader(&bytes);
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| StoreError::Csv {
                path: path.clone(),
                source,
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    async fn layout(&self, table: &TableHandle) -> Result<TableLayout, StoreError> {
        Ok(self.table_entry(table).await?.layout)
    }
}

async fn exists(path: &Path) -> Result<bool, StoreError> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|e| StoreError::io(path, e))
}

async fn append_line(path: &Path, line: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new().append(true).open(path).await?;
    file.write_all(line).await?;
    file.flush().await
}

// ---------------------------------------------------------------------------
// CSV helpers
// ---------------------------------------------------------------------------

fn csv_reader(bytes: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes)
}

fn count_rows(bytes: &[u8]) -> Result<u64, csv::Error> {
    let mut count = 0;
    for record in csv_reader(bytes).records() {
        record?;
        count += 1;
    }
    Ok(count)
}

/// One CSV line, terminator included.
fn encode_row(cells: &[String]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    writer.write_record(cells)?;
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Directory name for a store: lowercase ASCII alphanumerics separated by
/// single dashes.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("store");
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
