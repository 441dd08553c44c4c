use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("AI gateway rate limit exceeded")]
    RateLimited,

    #[error("AI gateway credits exhausted")]
    CreditsExhausted,

    #[error("AI gateway returned http {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("AI gateway unreachable: {0}")]
    Transport(String),

    #[error("AI reply could not be parsed: {0}")]
    MalformedResponse(String),
}

impl AiError {
    /// Map a non-success gateway status to an error.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::TOO_MANY_REQUESTS => AiError::RateLimited,
            StatusCode::PAYMENT_REQUIRED => AiError::CreditsExhausted,
            s => AiError::Upstream {
                status: s.as_u16(),
                body,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_statuses_get_dedicated_variants() {
        assert!(matches!(
            AiError::from_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            AiError::RateLimited
        ));
        assert!(matches!(
            AiError::from_status(StatusCode::PAYMENT_REQUIRED, String::new()),
            AiError::CreditsExhausted
        ));
        assert!(matches!(
            AiError::from_status(StatusCode::BAD_GATEWAY, "down".to_string()),
            AiError::Upstream { status: 502, .. }
        ));
    }
}
