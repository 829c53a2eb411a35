//! LLM client for the health-analysis backend.
//!
//! Speaks the OpenAI-compatible chat completions API with a blocking HTTP
//! client; the analysis path runs on a blocking task. A fake client is
//! provided so analysis behavior can be tested without a network.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// LLM configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Low sampling temperature keeps the verdict close to deterministic.
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_secs: 60,
            temperature: 0.3,
        }
    }
}

impl LlmConfig {
    /// Build a config from the environment: `GROQ_API_KEY` enables the AI
    /// path, `DROIDPULSE_LLM_ENDPOINT` / `DROIDPULSE_LLM_MODEL` override
    /// the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(endpoint) = std::env::var("DROIDPULSE_LLM_ENDPOINT") {
            if !endpoint.is_empty() {
                config.endpoint = endpoint;
            }
        }
        if let Ok(model) = std::env::var("DROIDPULSE_LLM_MODEL") {
            if !model.is_empty() {
                config.model = model;
            }
        }
        if let Ok(api_key) = std::env::var("GROQ_API_KEY") {
            if !api_key.is_empty() {
                config.api_key = Some(api_key);
            }
        }
        config
    }

    pub fn is_usable(&self) -> bool {
        self.api_key.is_some()
    }
}

/// LLM errors
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    #[error("not configured: set GROQ_API_KEY to enable AI analysis")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("request timeout after {0} seconds")]
    Timeout(u64),

    #[error("LLM returned empty response")]
    EmptyResponse,

    #[error("reply failed validation: {0}")]
    InvalidReply(String),
}

/// Generic LLM client: one prompt in, the raw reply text out.
pub trait LlmClient: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: String,
}

/// Real client over HTTP.
pub struct HttpLlmClient {
    config: LlmConfig,
    client: reqwest::blocking::Client,
}

impl HttpLlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Http(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }
}

impl LlmClient for HttpLlmClient {
    fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.config.api_key.as_ref().ok_or(LlmError::NotConfigured)?;
        let endpoint = format!(
            "{}/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            stream: false,
        };

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.config.timeout_secs)
                } else {
                    LlmError::Http(format!("request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(LlmError::Http(format!(
                "HTTP {} from {}",
                response.status(),
                endpoint
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .map_err(|e| LlmError::Http(format!("failed to decode response: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        if content.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(content)
    }
}

/// Fake LLM client for testing
pub struct FakeLlmClient {
    responses: Mutex<Vec<Result<String, LlmError>>>,
    call_count: Mutex<usize>,
}

impl FakeLlmClient {
    /// Create a fake client with pre-defined responses. The last response
    /// keeps repeating once the queue runs down to one entry.
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
        }
    }

    pub fn always(reply: impl Into<String>) -> Self {
        Self::new(vec![Ok(reply.into())])
    }

    pub fn always_error(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        self.call_count.lock().map(|count| *count).unwrap_or(0)
    }
}

impl LlmClient for FakeLlmClient {
    fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut count) = self.call_count.lock() {
            *count += 1;
        }
        let mut responses = match self.responses.lock() {
            Ok(responses) => responses,
            Err(_) => return Err(LlmError::EmptyResponse),
        };
        if responses.is_empty() {
            Err(LlmError::EmptyResponse)
        } else if responses.len() == 1 {
            responses[0].clone()
        } else {
            responses.remove(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = LlmConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.api_key.is_none());
        assert!(!config.is_usable());
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.temperature, 0.3);
    }

    #[test]
    fn fake_client_repeats_last_response() {
        let client = FakeLlmClient::always("{\"ok\": true}");
        assert_eq!(client.complete("prompt").unwrap(), "{\"ok\": true}");
        assert_eq!(client.complete("prompt").unwrap(), "{\"ok\": true}");
        assert_eq!(client.call_count(), 2);
    }

    #[test]
    fn fake_client_drains_queued_responses() {
        let client = FakeLlmClient::new(vec![
            Ok("first".to_string()),
            Err(LlmError::Timeout(60)),
        ]);
        assert_eq!(client.complete("").unwrap(), "first");
        assert!(matches!(client.complete(""), Err(LlmError::Timeout(60))));
        assert!(matches!(client.complete(""), Err(LlmError::Timeout(60))));
    }

    #[test]
    fn fake_client_error_path() {
        let client = FakeLlmClient::always_error(LlmError::NotConfigured);
        assert!(matches!(client.complete(""), Err(LlmError::NotConfigured)));
        assert_eq!(client.call_count(), 1);
    }
}
