//! intake-mail — notification mail for new requests.
//!
//! [`templates`] renders the two messages, a [`Mailer`] delivers them and the
//! [`Notifier`] ties the two together, keeping the outcome of each message
//! independent of the other.

use async_trait::async_trait;
use serde::Serialize;

pub mod log_only;
pub mod notifier;
pub mod relay;
pub mod templates;

pub use log_only::LogMailer;
pub use notifier::{Delivery, Notifier, NotifyReport};
pub use relay::RelayMailer;
pub use templates::Templates;

/// A plain-text message ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mail delivery failure.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid mail relay URL {url:?}: {reason}")]
    InvalidRelayUrl { url: String, reason: String },

    #[error("could not encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("mail relay unreachable: {0}")]
    Transport(String),

    #[error("mail relay rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Outbound mail transport. No delivery confirmation beyond the transport's
/// own acceptance is expected.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}
