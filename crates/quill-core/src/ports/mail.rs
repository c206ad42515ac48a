//! Outbound mail port. The actual transport is an external collaborator;
//! the core only hands it fully rendered messages.

use async_trait::async_trait;

/// Sends account mail.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver an email-verification link to a freshly registered account.
    async fn send_verification(&self, to: &str, name: &str, link: &str) -> Result<(), MailError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail transport failed: {0}")]
    Transport(String),
}
