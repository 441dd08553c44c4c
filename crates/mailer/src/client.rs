//! Email provider client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::MailerError;
use crate::message::EmailMessage;

/// Delivers a validated message and returns the provider's message id.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<String, MailerError>;
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

/// HTTP client for a Resend-style provider (`POST {base}/emails`, bearer key).
#[derive(Debug, Clone)]
pub struct HttpEmailClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl HttpEmailClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base_url: &str, api_key: String) -> Result<Self, MailerError> {
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("larder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}/emails", base_url.trim_end_matches('/')),
            api_key,
        })
    }
}

#[async_trait]
impl EmailSender for HttpEmailClient {
    async fn send(&self, message: &EmailMessage) -> Result<String, MailerError> {
        message.validate()?;

        let res = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        match res.status() {
            s if s.is_success() => {
                let body: SendResponse = res
                    .json()
                    .await
                    .map_err(|e| MailerError::Upstream {
                        status: s.as_u16(),
                        body: e.to_string(),
                    })?;
                tracing::info!(recipients = message.to.len(), id = %body.id, "email sent");
                Ok(body.id)
            }
            StatusCode::TOO_MANY_REQUESTS => Err(MailerError::RateLimited),
            s => {
                let body = res.text().await.unwrap_or_default();
                tracing::warn!(status = s.as_u16(), "email provider rejected message");
                Err(MailerError::Upstream {
                    status: s.as_u16(),
                    body,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::http::{HeaderMap, StatusCode as HttpStatus, header::AUTHORIZATION};
    use axum::{Json, Router, routing::post};
    use serde_json::{Value, json};

    use super::*;

    type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    /// Serve `reply` with `status` on `/emails`, recording requests.
    async fn spawn_provider(status: HttpStatus, reply: Value) -> (HttpEmailClient, Seen) {
        let seen: Seen = Arc::default();
        let recorded = seen.clone();
        let app = Router::new().route(
            "/emails",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let recorded = recorded.clone();
                let reply = reply.clone();
                async move {
                    let auth = headers
                        .get(AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    recorded.lock().unwrap().push((auth, body));
                    (status, Json(reply))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = HttpEmailClient::new(&format!("http://{addr}/"), "re_key".to_string()).unwrap();
        (client, seen)
    }

    fn message() -> EmailMessage {
        EmailMessage {
            from: "Larder <orders@larder.test>".to_string(),
            to: vec!["rep@sysco.example".to_string()],
            subject: "Order from Blue Plate".to_string(),
            html: None,
            text: Some("2 CS Chicken".to_string()),
        }
    }

    #[tokio::test]
    async fn success_returns_the_provider_id() {
        let (client, seen) = spawn_provider(HttpStatus::OK, json!({ "id": "em_1" })).await;

        assert_eq!(client.send(&message()).await.unwrap(), "em_1");

        let seen = seen.lock().unwrap();
        let (auth, body) = &seen[0];
        assert_eq!(auth.as_deref(), Some("Bearer re_key"));
        assert_eq!(body["to"][0], "rep@sysco.example");
        assert_eq!(body["text"], "2 CS Chicken");
        assert!(body.get("html").is_none());
    }

    #[tokio::test]
    async fn rate_limit_maps_to_its_own_variant() {
        let (client, _) = spawn_provider(HttpStatus::TOO_MANY_REQUESTS, json!({})).await;
        assert!(matches!(client.send(&message()).await, Err(MailerError::RateLimited)));
    }

    #[tokio::test]
    async fn other_failures_are_upstream() {
        let (client, _) =
            spawn_provider(HttpStatus::INTERNAL_SERVER_ERROR, json!({ "message": "down" })).await;
        match client.send(&message()).await {
            Err(MailerError::Upstream { status, body }) => {
                assert_eq!(status, 500);
                assert!(body.contains("down"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }

        let (client, _) = spawn_provider(HttpStatus::OK, json!({ "queued": true })).await;
        assert!(matches!(
            client.send(&message()).await,
            Err(MailerError::Upstream { status: 200, .. })
        ));
    }

    #[tokio::test]
    async fn invalid_messages_never_reach_the_provider() {
        let (client, seen) = spawn_provider(HttpStatus::OK, json!({ "id": "em_1" })).await;
        let mut bad = message();
        bad.to.clear();

        assert!(matches!(client.send(&bad).await, Err(MailerError::InvalidMessage(_))));
        assert!(seen.lock().unwrap().is_empty());
    }
}
