use async_trait::async_trait;

pub mod smtp;
pub mod templates;
pub mod testing;

pub use smtp::SmtpMailer;

/// A fully addressed outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Mail delivery failures
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp transport failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("mail task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Outbound mail delivery
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `mail`, returning the server's delivery identifier
    async fn send_message(&self, mail: OutgoingMail) -> Result<String, MailError>;
}
