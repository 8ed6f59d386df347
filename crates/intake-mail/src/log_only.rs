//! Mailer used when no relay is configured: messages go to the log.

use crate::{Email, MailError, Mailer};
use async_trait::async_trait;

#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        tracing::info!(
            from = %email.from,
            to = %email.to,
            subject = %email.subject,
            "no mail relay configured; message logged instead of sent"
        );
        tracing::debug!(to = %email.to, body = %email.body, "logged message body");
        Ok(())
    }
}
