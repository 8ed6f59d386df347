//! intake — Desi Arms request intake.
//!
//! Receives form submissions over HTTP, records each one as a row in the
//! request table, and mails a notification to staff plus a confirmation to
//! the submitter. The pipeline layers live in the member crates; this crate
//! wires them to an HTTP server so that integration tests can drive the whole
//! path in process.
//!
//! # Architecture
//!
//! ```text
//! HTTP ──► Dispatcher ──► intake-core (decode, normalize)
//!              │
//!              ├──► intake-store (resolve, append)
//!              │
//!              └──► intake-mail  (notify)
//! ```

pub mod dispatcher;
pub mod logging;
pub mod server;

pub use dispatcher::{Dispatcher, Receipt};
pub use server::{Server, SubmitResponse};

/// Errors that end a request with `{"status":"error"}`. The message shown to
/// the caller is the underlying error's text.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Decode(#[from] intake_core::DecodeError),
    #[error(transparent)]
    Store(#[from] intake_store::StoreError),
}
