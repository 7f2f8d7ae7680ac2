//! Chat-completions client for OpenAI-compatible providers.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use super::{ChapterSource, GenerationError, Prompt};
use crate::plan::Section;

/// DashScope's OpenAI-compatible endpoint.
pub const DEFAULT_ENDPOINT: &str =
    "https://dashscope-intl.aliyuncs.com/compatible-mode/v1/chat/completions";

/// Default completion model.
pub const DEFAULT_MODEL: &str = "qwen-turbo";

/// Provider settings for [`CompletionClient`].
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl CompletionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(300),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Blocking chat-completions client. Sends one request per section and
/// never retries.
pub struct CompletionClient {
    config: CompletionConfig,
    client: reqwest::blocking::Client,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Result<Self, GenerationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn complete(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        let body = serde_json::json!({
            "model": &self.config.model,
            "messages": [
                {"role": "system", "content": &prompt.system},
                {"role": "user", "content": &prompt.user}
            ]
        });

        debug!(endpoint = %self.config.endpoint, model = %self.config.model, "sending completion request");
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().map_err(transport_error)?;
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(GenerationError::Authentication(status.as_u16()));
        }
        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_completion(&text)
    }
}

impl ChapterSource for CompletionClient {
    fn generate(
        &self,
        section: &Section,
        topic: &str,
        audience: &str,
    ) -> Result<String, GenerationError> {
        self.complete(&Prompt::for_section(section, topic, audience))
    }
}

fn transport_error(e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
        GenerationError::Timeout
    } else {
        GenerationError::Transport(e.to_string())
    }
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

/// Extract the first choice's message text from a response body.
fn parse_completion(body: &str) -> Result<String, GenerationError> {
    let response: CompletionResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(GenerationError::Empty)?;

    if content.trim().is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(content)
}
