pub mod graph;
pub mod templates;

use async_trait::async_trait;

/// A rendered message ready for relay. The recipient is fixed by the relay.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub subject: String,
    pub html_body: String,
    pub reply_to_name: String,
    pub reply_to_address: String,
}

#[derive(Debug)]
pub enum RelayError {
    Token(String),
    Send(String),
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayError::Token(msg) => write!(f, "token request failed: {msg}"),
            RelayError::Send(msg) => write!(f, "mail send failed: {msg}"),
        }
    }
}

impl std::error::Error for RelayError {}

#[async_trait]
pub trait MailRelay: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), RelayError>;
}
