//! Notifier — sends the internal notification and the customer confirmation.
//!
//! The two sends are independent: a failure in one neither prevents the
//! other nor becomes an error for the caller. Each outcome is logged and
//! returned in a [`NotifyReport`].

use crate::{Email, Mailer, Templates};
use intake_core::Submission;
use std::sync::Arc;

/// Outcome of one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// Not attempted (no customer address).
    Skipped,
    Failed(String),
}

impl Delivery {
    pub fn is_sent(&self) -> bool {
        matches!(self, Delivery::Sent)
    }
}

impl std::fmt::Display for Delivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delivery::Sent => write!(f, "sent"),
            Delivery::Skipped => write!(f, "skipped"),
            Delivery::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Outcomes of both messages for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyReport {
    pub internal: Delivery,
    pub customer: Delivery,
}

pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    templates: Templates,
    operator_address: String,
    from_address: String,
}

impl Notifier {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        templates: Templates,
        operator_address: impl Into<String>,
        from_address: impl Into<String>,
    ) -> Self {
        Self {
            mailer,
            templates,
            operator_address: operator_address.into(),
            from_address: from_address.into(),
        }
    }

    pub async fn notify(&self, submission: &Submission) -> NotifyReport {
        let internal = Email {
            from: self.from_address.clone(),
            to: self.operator_address.clone(),
            subject: self.templates.internal_subject(submission),
            body: self.templates.internal_body(submission),
        };
        let internal = self.deliver("internal", &internal).await;

        let customer = if submission.email.is_empty() {
            tracing::debug!("no customer address; confirmation skipped");
            Delivery::Skipped
        } else {
            let confirmation = Email {
                from: self.from_address.clone(),
                to: submission.email.clone(),
                subject: self.templates.customer_subject(submission),
                body: self.templates.customer_body(submission),
            };
            self.deliver("customer", &confirmation).await
        };

        NotifyReport { internal, customer }
    }

    async fn deliver(&self, kind: &'static str, email: &Email) -> Delivery {
        match self.mailer.send(email).await {
            Ok(()) => {
                tracing::info!(kind, to = %email.to, "notification sent");
                Delivery::Sent
            }
            Err(e) => {
                tracing::warn!(kind, to = %email.to, error = %e, "notification failed");
                Delivery::Failed(e.to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
