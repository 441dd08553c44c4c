use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("email provider rate limit exceeded")]
    RateLimited,

    #[error("email provider returned http {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("email provider unreachable: {0}")]
    Transport(String),
}

impl MailerError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidMessage(msg.into())
    }
}
