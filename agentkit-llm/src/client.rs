use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    ChatCompletionParameters, ChatCompletionParametersBuilder, ChatCompletionResponse,
    ChatCompletionTool, ChatMessage, ChatProvider, LlmError,
};

pub const XAI_BASE_URL: &str = "https://api.x.ai/v1";
pub const XAI_DEFAULT_MODEL: &str = "grok-beta";

/// Configuration for an OpenAI-compatible chat-completions endpoint
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: Option<f32>,
    /// Retries after the first attempt, for transient failures only
    pub max_retries: u32,
}

impl LlmConfig {
    /// xAI endpoint with the default model
    pub fn xai(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: XAI_BASE_URL.to_string(),
            model: XAI_DEFAULT_MODEL.to_string(),
            temperature: None,
            max_retries: 2,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

/// HTTP client for `POST {base_url}/chat/completions`
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Config("API key is empty".to_string()));
        }
        if reqwest::Url::parse(&config.base_url).is_err() {
            return Err(LlmError::Config(format!("invalid base URL: {}", config.base_url)));
        }
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Request body; `tools` is left unset when no tools are bound
    fn parameters(
        &self,
        messages: &[ChatMessage],
        tools: &[ChatCompletionTool],
    ) -> Result<ChatCompletionParameters, LlmError> {
        let mut builder = ChatCompletionParametersBuilder::default();
        builder.model(self.config.model.clone()).messages(messages.to_vec());
        if !tools.is_empty() {
            builder.tools(tools.to_vec());
        }
        if let Some(temperature) = self.config.temperature {
            builder.temperature(temperature);
        }
        builder.build().map_err(|e| LlmError::Config(e.to_string()))
    }

    async fn send_once(&self, body: &ChatCompletionParameters) -> Result<ChatMessage, LlmError> {
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status: status.as_u16(), body });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(LlmError::EmptyResponse)
    }
}

/// Exponential backoff starting at 500ms, plus up to 250ms of jitter
fn backoff(attempt: u32) -> Duration {
    let base = 500u64.saturating_mul(1 << attempt.saturating_sub(1).min(6));
    Duration::from_millis(base + fastrand::u64(0..250))
}

#[async_trait]
impl ChatProvider for LlmClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ChatCompletionTool],
    ) -> Result<ChatMessage, LlmError> {
        let body = self.parameters(messages, tools)?;

        let mut attempt = 0;
        loop {
            debug!("chat completion model={} messages={} attempt={}", self.config.model, messages.len(), attempt);
            match self.send_once(&body).await {
                Ok(message) => return Ok(message),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = backoff(attempt);
                    warn!("chat completion failed ({}), retrying in {:?}", e, delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::user;
    use crate::{ChatCompletionFunction, ChatCompletionToolType};
    use serde_json::json;

    #[test]
    fn rejects_empty_api_key() {
        let err = LlmClient::new(LlmConfig::xai("  ")).err().unwrap();
        assert!(matches!(err, LlmError::Config(_)));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let err = LlmClient::new(LlmConfig::xai("key").with_base_url("not a url"))
            .err()
            .unwrap();
        assert!(matches!(err, LlmError::Config(_)));
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let client = LlmClient::new(LlmConfig::xai("key").with_base_url("http://localhost:8080/v1/")).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    fn client() -> LlmClient {
        LlmClient::new(LlmConfig::xai("key")).unwrap()
    }

    #[test]
    fn body_omits_empty_tool_list() {
        let body = client().parameters(&[user("hi")], &[]).unwrap();
        assert!(body.tools.is_none());

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "grok-beta");
        assert_eq!(value["messages"][0]["role"], "user");
        assert!(value.get("tools").is_none());
        assert!(value.get("temperature").is_none());
    }

    #[test]
    fn body_advertises_bound_tools() {
        let tool = ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: ChatCompletionFunction {
                name: "get_wallet_details".to_string(),
                description: Some("Get details about the wallet".to_string()),
                parameters: json!({"type": "object", "properties": {}}),
            },
        };
        let body = client().parameters(&[user("hi")], &[tool]).unwrap();

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["tools"][0]["type"], "function");
        assert_eq!(value["tools"][0]["function"]["name"], "get_wallet_details");
        assert_eq!(value["tools"][0]["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn backoff_grows_with_attempts() {
        assert!(backoff(1) < Duration::from_millis(750));
        assert!(backoff(3) >= Duration::from_millis(2000));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let rendered = format!("{:?}", LlmConfig::xai("secret-key"));
        assert!(!rendered.contains("secret-key"));
    }
}
