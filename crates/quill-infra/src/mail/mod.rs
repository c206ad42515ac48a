//! Outbound mail. The real SMTP transport lives outside this service; this
//! implementation records the message through the log pipeline so local
//! environments can complete the verification flow without a mail server.

use async_trait::async_trait;

use quill_core::ports::{MailError, Mailer};

/// Tracing-backed mailer.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification(&self, to: &str, name: &str, link: &str) -> Result<(), MailError> {
        tracing::info!(
            recipient = %to,
            recipient_name = %name,
            verification_link = %link,
            "Verification email queued"
        );
        Ok(())
    }
}
