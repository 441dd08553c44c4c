use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use larder_ai::AiError;
use larder_core::DomainError;
use larder_mailer::MailerError;
use larder_vendors::VendorError;

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn bad_request(message: impl Into<String>) -> Response {
    json_error(StatusCode::BAD_REQUEST, "bad_request", message)
}

pub fn not_found(message: impl Into<String>) -> Response {
    json_error(StatusCode::NOT_FOUND, "not_found", message)
}

/// Unwrap a JSON body, turning any extractor rejection into a 400.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    body.map(|Json(v)| v)
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, "invalid_body", e.body_text()))
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    match err {
        e @ DomainError::Validation { .. } => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string())
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        e @ DomainError::NotFound(_) => not_found(e.to_string()),
    }
}

pub fn ai_error_to_response(err: AiError) -> Response {
    match err {
        AiError::InvalidInput(msg) => bad_request(msg),
        AiError::RateLimited => json_error(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "AI gateway rate limit exceeded, try again shortly",
        ),
        AiError::CreditsExhausted => json_error(
            StatusCode::PAYMENT_REQUIRED,
            "credits_exhausted",
            "AI credits exhausted",
        ),
        e @ (AiError::Upstream { .. } | AiError::Transport(_) | AiError::MalformedResponse(_)) => {
            tracing::error!(error = %e, "invoice parsing failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "parse_failed", "failed to parse invoice")
        }
    }
}

pub fn mailer_error_to_response(err: MailerError) -> Response {
    match err {
        MailerError::InvalidMessage(msg) => bad_request(msg),
        MailerError::RateLimited => json_error(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "email provider rate limit exceeded, try again shortly",
        ),
        e @ (MailerError::Upstream { .. } | MailerError::Transport(_)) => {
            tracing::error!(error = %e, "email delivery failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "send_failed", "failed to send email")
        }
    }
}

pub fn vendor_error_to_response(err: VendorError) -> Response {
    not_found(err.to_string())
}

pub fn not_configured(what: &str) -> Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "not_configured",
        format!("{what} is not configured"),
    )
}
