//! Runtime configuration, read from the environment.

use std::net::SocketAddr;

use anyhow::Context;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_AI_GATEWAY_URL: &str = "https://api.openai.com/v1";
const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com";
const DEFAULT_EMAIL_FROM: &str = "Larder <no-reply@larder.app>";

/// Chat-completion gateway settings (present only when a key is configured).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiGatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// Email provider settings (present only when a key is configured).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub base_url: String,
    pub api_key: String,
    pub from: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub ai: Option<AiGatewayConfig>,
    pub email: Option<EmailConfig>,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map instead of the env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get("LARDER_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("LARDER_BIND_ADDR must be a socket address like 0.0.0.0:8080")?;

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let ai = match get("AI_GATEWAY_API_KEY") {
            Some(api_key) => Some(AiGatewayConfig {
                base_url: get("AI_GATEWAY_URL").unwrap_or_else(|| DEFAULT_AI_GATEWAY_URL.to_string()),
                api_key,
                model: get("AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            }),
            None => {
                tracing::warn!("AI_GATEWAY_API_KEY not set; invoice parsing is disabled");
                None
            }
        };

        let email = match get("EMAIL_API_KEY") {
            Some(api_key) => Some(EmailConfig {
                base_url: get("EMAIL_API_URL").unwrap_or_else(|| DEFAULT_EMAIL_API_URL.to_string()),
                api_key,
                from: get("EMAIL_FROM").unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),
            }),
            None => {
                tracing::warn!("EMAIL_API_KEY not set; email delivery is disabled");
                None
            }
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            ai,
            email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> anyhow::Result<ApiConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_leave_integrations_off() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.jwt_secret, "dev-secret");
        assert!(cfg.ai.is_none());
        assert!(cfg.email.is_none());
    }

    #[test]
    fn keys_enable_integrations_with_defaults() {
        let cfg = config(&[("AI_GATEWAY_API_KEY", "k1"), ("EMAIL_API_KEY", "k2"), ("EMAIL_FROM", "a@b.co")])
            .unwrap();
        let ai = cfg.ai.unwrap();
        assert_eq!(ai.model, DEFAULT_AI_MODEL);
        assert_eq!(ai.base_url, DEFAULT_AI_GATEWAY_URL);
        assert_eq!(cfg.email.unwrap().from, "a@b.co");
    }

    #[test]
    fn blank_values_count_as_missing() {
        let cfg = config(&[("AI_GATEWAY_API_KEY", "   ")]).unwrap();
        assert!(cfg.ai.is_none());
    }

    #[test]
    fn bad_bind_addr_is_an_error() {
        assert!(config(&[("LARDER_BIND_ADDR", "nope")]).is_err());
    }
}
