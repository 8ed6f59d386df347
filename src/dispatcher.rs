//! Request dispatcher — one submission, start to finish.
//!
//! ```text
//! decode ──► resolve store ──► normalize ──► append ──► notify (internal, customer)
//!   │             │                            │              │
//!   └─────────────┴──────── error ◄────────────┘        logged only
//! ```
//!
//! Decode and persistence failures end the request with an error and nothing
//! is mailed. Once the row is appended the request has succeeded; mail
//! outcomes are reported in the [`Receipt`] and the log but never turn into
//! an error.

use crate::IntakeError;
use anyhow::Context;
use intake_core::config::{Config, StoreBackendKind};
use intake_core::normalizer::normalize_now;
use intake_core::{payload, Clock, SystemClock};
use intake_mail::{LogMailer, Mailer, Notifier, NotifyReport, RelayMailer, Templates};
use intake_store::{
    Appender, DirectoryBackend, MemoryBackend, StoreBackend, StoreResolver, TableHandle,
};
use std::sync::Arc;

/// What a successful dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub table: TableHandle,
    /// 1-based row number of the new record (row 1 is the header).
    pub row: u64,
    pub notifications: NotifyReport,
}

pub struct Dispatcher {
    store_name: String,
    resolver: StoreResolver,
    appender: Appender,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
}

impl Dispatcher {
    pub fn new(config: &Config, backend: Arc<dyn StoreBackend>, mailer: Arc<dyn Mailer>) -> Self {
        let templates = Templates::new(&config.notify.brand, &config.store.name);
        Self {
            store_name: config.store.name.clone(),
            resolver: StoreResolver::new(backend.clone()),
            appender: Appender::new(backend),
            notifier: Notifier::new(
                mailer,
                templates,
                &config.notify.operator_address,
                &config.notify.from_address,
            ),
            clock: Arc::new(SystemClock::new()),
        }
    }

    /// Build the backend and mailer named by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let backend: Arc<dyn StoreBackend> = match config.store.backend {
            StoreBackendKind::Directory => {
                tracing::info!(
                    root = %config.store.root.display(),
                    "using directory store backend"
                );
                Arc::new(DirectoryBackend::new(&config.store.root))
            }
            StoreBackendKind::Memory => {
                tracing::warn!("using in-memory store backend; requests are lost on exit");
                Arc::new(MemoryBackend::new())
            }
        };

        let mailer: Arc<dyn Mailer> = match config.notify.relay_url() {
            Some(url) => {
                let relay = RelayMailer::new(url).context("configuring mail relay")?;
                tracing::info!(endpoint = %relay.endpoint(), "using HTTP mail relay");
                Arc::new(relay)
            }
            None => {
                tracing::warn!("notify.relay_url not set; notifications are only logged");
                Arc::new(LogMailer)
            }
        };

        Ok(Self::new(config, backend, mailer))
    }

    /// Replace the timestamp source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn dispatch(&self, body: &[u8]) -> Result<Receipt, IntakeError> {
        let submission = payload::decode(body)?;
        let table = self.resolver.resolve(&self.store_name).await?;
        let record = normalize_now(&submission, self.clock.as_ref());
        let row = self.appender.append(&table, &record).await?;

        let notifications = self.notifier.notify(&submission).await;
        tracing::info!(
            row,
            internal = %notifications.internal,
            customer = %notifications.customer,
            "request recorded"
        );

        Ok(Receipt {
            table,
            row,
            notifications,
        })
    }
}
