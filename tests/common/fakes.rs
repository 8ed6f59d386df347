//! In-process fakes for the mail transport and the store backend.

use async_trait::async_trait;
use intake_core::TableLayout;
use intake_mail::{Email, MailError, Mailer};
use intake_store::{MemoryBackend, StoreBackend, StoreError, StoreId, TableHandle};
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// RecordingMailer
// ---------------------------------------------------------------------------

/// Mailer that records every message it is asked to send. Can be told to
/// fail every send, or only sends to specific addresses.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Email>>,
    fail_all: bool,
    fail_to: Vec<String>,
}

impl RecordingMailer {
    /// A mailer whose every send fails (after being recorded).
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn failing_for(address: &str) -> Self {
        Self {
            fail_to: vec![address.to_string()],
            ..Self::default()
        }
    }

    /// Every attempted message, in order.
    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent().into_iter().map(|e| e.to).collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail_all || self.fail_to.contains(&email.to) {
            return Err(MailError::Rejected {
                status: 550,
                body: "mailbox unavailable".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FlakyBackend
// ---------------------------------------------------------------------------

/// Which backend operation a [`FlakyBackend`] should break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakage {
    Create,
    Append,
}

/// [`MemoryBackend`] wrapper that fails one kind of operation with an I/O
/// error.
pub struct FlakyBackend {
    inner: MemoryBackend,
    breakage: Breakage,
}

impl FlakyBackend {
    pub fn new(breakage: Breakage) -> Self {
        Self {
            inner: MemoryBackend::new(),
            breakage,
        }
    }

    pub fn inner(&self) -> &MemoryBackend {
        &self.inner
    }

    fn failure(&self, what: &str) -> StoreError {
        StoreError::Io {
            path: format!("flaky/{what}").into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded"),
        }
    }
}

#[async_trait]
impl StoreBackend for FlakyBackend {
    async fn find_by_name(&self, name: &str) -> Result<Option<StoreId>, StoreError> {
        self.inner.find_by_name(name).await
    }

    async fn first_table(&self, store: &StoreId) -> Result<TableHandle, StoreError> {
        self.inner.first_table(store).await
    }

    async fn create_store(
        &self,
        name: &str,
        layout: &TableLayout,
    ) -> Result<TableHandle, StoreError> {
        if self.breakage == Breakage::Create {
            return Err(self.failure("create"));
        }
        self.inner.create_store(name, layout).await
    }

    async fn append_row(&self, table: &TableHandle, cells: Vec<String>) -> Result<u64, StoreError> {
        if self.breakage == Breakage::Append {
            return Err(self.failure("append"));
        }
        self.inner.append_row(table, cells).await
    }

    async fn read_rows(&self, table: &TableHandle) -> Result<Vec<Vec<String>>, StoreError> {
        self.inner.read_rows(table).await
    }

    async fn layout(&self, table: &TableHandle) -> Result<TableLayout, StoreError> {
        self.inner.layout(table).await
    }
}
