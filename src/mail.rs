use thiserror::Error;

pub type MailResult<T> = std::result::Result<T, MailError>;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport error: {0}")]
    Transport(String),
}

/// Outgoing mail capability. The data layer only needs "send a message to
/// this address"; the actual transport lives with the surrounding
/// application.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> MailResult<()>;
}

/// Development transport that writes outgoing mail to the log instead of
/// delivering it.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new<S: Into<String>>(from: S) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait::async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> MailResult<()> {
        tracing::info!(
            from = %self.from,
            to = %to,
            subject = %subject,
            "outgoing mail: {}",
            body
        );
        Ok(())
    }
}
