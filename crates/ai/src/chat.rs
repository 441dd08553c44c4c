//! Chat-completion gateway client (OpenAI-compatible wire format).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::AiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
}

/// Anything that can answer a chat request with the assistant's text.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String, AiError>;
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for a hosted chat-completion gateway.
///
/// Single attempt per call: rate-limit and credit errors are surfaced to the
/// caller as-is.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl HttpChatClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// `base_url` is the gateway root, e.g. `https://gateway.example.com/v1`.
    pub fn new(base_url: &str, api_key: String, model: String) -> Result<Self, AiError> {
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("larder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatCompletion for HttpChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, AiError> {
        let body = WireRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
        };

        let res = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "chat completion failed");
            return Err(AiError::from_status(status, text));
        }

        let parsed: WireResponse = res
            .json()
            .await
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| AiError::MalformedResponse("empty completion".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client =
            HttpChatClient::new("https://gw.example.com/v1/", "k".to_string(), "m".to_string())
                .unwrap();
        assert_eq!(client.endpoint, "https://gw.example.com/v1/chat/completions");
    }

    #[test]
    fn wire_request_omits_missing_temperature() {
        let messages = vec![ChatMessage::user("hi")];
        let body = WireRequest {
            model: "m",
            messages: &messages,
            temperature: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("temperature").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn wire_response_reads_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"{}"}}]}"#;
        let parsed: WireResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("{}"));
    }

    mod gateway {
        use std::sync::{Arc, Mutex};

        use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
        use axum::{Json, Router, routing::post};
        use serde_json::{Value, json};

        use crate::chat::{ChatCompletion, ChatMessage, ChatRequest, HttpChatClient};
        use crate::error::AiError;

        type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

        /// Serve `reply` with `status` on `/v1/chat/completions`, recording requests.
        async fn spawn_gateway(status: StatusCode, reply: Value) -> (HttpChatClient, Seen) {
            let seen: Seen = Arc::default();
            let recorded = seen.clone();
            let app = Router::new().route(
                "/v1/chat/completions",
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

            let client = HttpChatClient::new(
                &format!("http://{addr}/v1"),
                "key-123".to_string(),
                "gpt-test".to_string(),
            )
            .unwrap();
            (client, seen)
        }

        fn request() -> ChatRequest {
            ChatRequest {
                messages: vec![ChatMessage::system("extract"), ChatMessage::user("2 CS chicken")],
                temperature: Some(0.0),
            }
        }

        #[tokio::test]
        async fn success_returns_the_first_choice() {
            let reply = json!({ "choices": [{ "message": { "role": "assistant", "content": "{\"total\": 1}" } }] });
            let (client, seen) = spawn_gateway(StatusCode::OK, reply).await;

            let content = client.complete(request()).await.unwrap();
            assert_eq!(content, "{\"total\": 1}");

            let seen = seen.lock().unwrap();
            let (auth, body) = &seen[0];
            assert_eq!(auth.as_deref(), Some("Bearer key-123"));
            assert_eq!(body["model"], "gpt-test");
            assert_eq!(body["messages"][0]["role"], "system");
            assert_eq!(body["messages"][1]["content"], "2 CS chicken");
            assert_eq!(body["temperature"], 0.0);
        }

        #[tokio::test]
        async fn rate_limit_and_credit_statuses_map_to_variants() {
            let (client, _) = spawn_gateway(StatusCode::TOO_MANY_REQUESTS, json!({})).await;
            assert!(matches!(client.complete(request()).await, Err(AiError::RateLimited)));

            let (client, _) = spawn_gateway(StatusCode::PAYMENT_REQUIRED, json!({})).await;
            assert!(matches!(
                client.complete(request()).await,
                Err(AiError::CreditsExhausted)
            ));
        }

        #[tokio::test]
        async fn server_error_is_upstream_with_body() {
            let (client, _) =
                spawn_gateway(StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "boom" })).await;

            match client.complete(request()).await {
                Err(AiError::Upstream { status, body }) => {
                    assert_eq!(status, 500);
                    assert!(body.contains("boom"));
                }
                other => panic!("expected upstream error, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn empty_choices_are_malformed() {
            let (client, _) = spawn_gateway(StatusCode::OK, json!({ "choices": [] })).await;
            assert!(matches!(
                client.complete(request()).await,
                Err(AiError::MalformedResponse(_))
            ));
        }
    }
}
