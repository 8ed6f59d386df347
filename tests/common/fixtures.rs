//! Ready-made dispatcher setups used across harnesses.

use crate::common::fakes::RecordingMailer;
use intake::Dispatcher;
use intake_core::config::Config;
use intake_mail::Mailer;
use intake_store::{MemoryBackend, StoreBackend, TableHandle};
use std::sync::Arc;

/// Store name used by every harness.
pub const STORE_NAME: &str = "Desi Arms — Customer Requests";

pub const OPERATOR: &str = "ops@desiarms.com";

/// Defaults with the operator address pinned.
pub fn test_config() -> Config {
    let mut config = Config::defaults();
    config.store.name = STORE_NAME.to_string();
    config.notify.operator_address = OPERATOR.to_string();
    config
}

/// A dispatcher over an in-memory store and a recording mailer, with both
/// kept reachable for assertions.
pub struct Harness {
    pub backend: Arc<MemoryBackend>,
    pub mailer: Arc<RecordingMailer>,
    pub dispatcher: Dispatcher,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_mailer(RecordingMailer::default())
    }

    pub fn with_mailer(mailer: RecordingMailer) -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let mailer = Arc::new(mailer);
        let dispatcher = Dispatcher::new(
            &test_config(),
            backend.clone() as Arc<dyn StoreBackend>,
            mailer.clone() as Arc<dyn Mailer>,
        );
        Self {
            backend,
            mailer,
            dispatcher,
        }
    }

    /// Handle of the request table, if it has been provisioned.
    pub async fn table(&self) -> Option<TableHandle> {
        let store = self.backend.find_by_name(STORE_NAME).await.unwrap()?;
        Some(self.backend.first_table(&store).await.unwrap())
    }

    /// All rows of the request table, header first. Empty if none exists.
    pub async fn rows(&self) -> Vec<Vec<String>> {
        match self.table().await {
            Some(table) => self.backend.read_rows(&table).await.unwrap(),
            None => Vec::new(),
        }
    }
}
