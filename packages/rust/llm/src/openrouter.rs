//! OpenAI-compatible chat-completions client (OpenRouter by default).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use supportdesk_shared::{AppConfig, Result, SupportDeskError};
use tracing::{debug, instrument};

use crate::{ChatMessage, LanguageModel};

/// User-Agent string for completion requests.
const USER_AGENT: &str = concat!("SupportDesk/", env!("CARGO_PKG_VERSION"));

/// Longest slice of an error body echoed into error messages.
const MAX_ERROR_BODY: usize = 500;

/// Connection settings for [`OpenRouterClient`].
#[derive(Debug, Clone)]
pub struct OpenRouterOptions {
    /// API base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl OpenRouterOptions {
    /// Build options from the `[llm]` config section and a resolved API key.
    pub fn from_config(config: &AppConfig, api_key: String) -> Self {
        Self {
            base_url: config.llm.base_url.clone(),
            api_key,
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            timeout_secs: config.llm.request_timeout_secs,
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenRouterClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenRouterClient {
    pub fn new(opts: OpenRouterOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| SupportDeskError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", opts.base_url.trim_end_matches('/')),
            api_key: opts.api_key,
            model: opts.model,
            temperature: opts.temperature,
        })
    }
}

#[async_trait]
impl LanguageModel for OpenRouterClient {
    #[instrument(skip_all, fields(model = %self.model, messages = messages.len()))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SupportDeskError::Model(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = &body[..floor_char_boundary(&body, MAX_ERROR_BODY)];
            return Err(SupportDeskError::Model(format!("HTTP {status}: {body}")));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| SupportDeskError::Model(format!("invalid completion response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SupportDeskError::Model("completion returned no choices".into()))?;

        debug!(chars = content.len(), "completion received");
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Largest char boundary not past `max`.
fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn options(server: &MockServer) -> OpenRouterOptions {
        OpenRouterOptions {
            base_url: format!("{}/api/v1/", server.uri()),
            api_key: "test-key".into(),
            model: "test/model".into(),
            temperature: 0.0,
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn complete_returns_first_choice() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "test/model",
                "messages": [{"role": "user", "content": "Is it relevant?"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": " YES\n"}}]
            })))
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(options(&server)).unwrap();
        let reply = client.prompt("Is it relevant?").await.unwrap();
        assert_eq!(reply, " YES\n");
        assert_eq!(client.model_name(), "test/model");
    }

    #[tokio::test]
    async fn http_error_becomes_model_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(options(&server)).unwrap();
        let err = client.prompt("hi").await.unwrap_err();
        assert!(matches!(err, SupportDeskError::Model(_)));
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(options(&server)).unwrap();
        let err = client.prompt("hi").await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }

    #[test]
    fn char_boundary_never_splits_utf8() {
        let s = "héllo";
        assert_eq!(floor_char_boundary(s, 2), 1);
        assert_eq!(floor_char_boundary(s, 100), s.len());
    }
}
