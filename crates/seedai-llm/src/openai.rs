//! OpenAI Generator Implementation
//!
//! Sends the decoded prompt to the chat completions API and asks for `count`
//! choices in a single request. Choices are yielded in the order the API
//! returns them; empty choices are dropped.
//!
//! Legacy fine-tuned models (`base:ft-...`) only speak the plain completions
//! API. With `legacy` set, the prompt goes to `/v1/completions` as one text,
//! the system segment in front of it, and the tokenizer's stop marker is sent
//! as a stop sequence.

use crate::{http, LlmError};
use futures::stream::{self, StreamExt};
use seedai_domain::{Completions, GenerationPrompt, Generator, Tokenizer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Default API base URL
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Settings for the OpenAI backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API base URL. Default: `https://api.openai.com`
    pub endpoint: String,

    /// Model name. Default: `gpt-3.5-turbo`
    pub model: String,

    /// API key; required before the first request
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Number of choices to request. Default: 10
    pub count: usize,

    /// Sampling temperature. Default: 0.2
    pub temperature: f32,

    /// Presence penalty. Default: 2.0
    pub presence_penalty: f32,

    /// Frequency penalty. Default: 2.0
    pub frequency_penalty: f32,

    /// Maximum tokens per choice; `None` lets the API decide
    pub max_tokens: Option<u32>,

    /// Stop sequences (at most four are accepted by the API)
    pub stop: Vec<String>,

    /// Request timeout in seconds. Default: 120
    pub timeout_secs: u64,

    /// Attempts per request. Default: 3
    pub max_retries: u32,

    /// Use the legacy completions API. Default: false
    pub legacy: bool,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: None,
            count: 10,
            temperature: 0.2,
            presence_penalty: 2.0,
            frequency_penalty: 2.0,
            max_tokens: None,
            stop: Vec::new(),
            timeout_secs: 120,
            max_retries: 3,
            legacy: false,
        }
    }
}

/// OpenAI chat completions generator
pub struct OpenAiGenerator {
    config: OpenAiConfig,
    api_key: String,
    tokenizer: Arc<dyn Tokenizer>,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    n: usize,
    presence_penalty: f32,
    frequency_penalty: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    prompt: String,
    temperature: f32,
    n: usize,
    presence_penalty: f32,
    frequency_penalty: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

/// Reply shape shared by both APIs
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
    /// Set by the completions API
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiGenerator {
    /// Create a new OpenAI generator
    ///
    /// Fails with [`LlmError::MissingApiKey`] when `config.api_key` is unset.
    pub fn new(config: OpenAiConfig, tokenizer: Arc<dyn Tokenizer>) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(LlmError::MissingApiKey(API_KEY_ENV))?;
        let client = http::client(config.timeout_secs)?;

        Ok(Self {
            config,
            api_key,
            tokenizer,
            client,
        })
    }

    /// Backend settings
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn request_body(&self, prompt: &GenerationPrompt) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &prompt.system {
            messages.push(ChatMessage {
                role: "system",
                content: self.tokenizer.decode(system),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: self.tokenizer.decode(&prompt.user),
        });

        ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.temperature,
            n: self.config.count,
            presence_penalty: self.config.presence_penalty,
            frequency_penalty: self.config.frequency_penalty,
            max_tokens: self.config.max_tokens,
            stop: self.config.stop.clone(),
        }
    }

    fn completion_body(&self, prompt: &GenerationPrompt) -> CompletionRequest {
        let user = self.tokenizer.decode(&prompt.user);
        let text = match &prompt.system {
            Some(system) => format!("{}\n\n{}", self.tokenizer.decode(system), user),
            None => user,
        };

        let mut stop = self.config.stop.clone();
        if let Some(marker) = self.tokenizer.stop_text() {
            stop.push(marker);
        }

        CompletionRequest {
            model: self.config.model.clone(),
            prompt: text,
            temperature: self.config.temperature,
            n: self.config.count,
            presence_penalty: self.config.presence_penalty,
            frequency_penalty: self.config.frequency_penalty,
            max_tokens: self.config.max_tokens,
            stop,
        }
    }

    async fn complete(&self, prompt: &GenerationPrompt) -> Result<Vec<String>, LlmError> {
        let response: ChatResponse = if self.config.legacy {
            let url = format!("{}/v1/completions", self.config.endpoint);
            self.post(&url, &self.completion_body(prompt)).await?
        } else {
            let url = format!("{}/v1/chat/completions", self.config.endpoint);
            self.post(&url, &self.request_body(prompt)).await?
        };

        debug!("API returned {} choices", response.choices.len());
        Ok(choice_contents(response))
    }

    async fn post<B: Serialize>(&self, url: &str, body: &B) -> Result<ChatResponse, LlmError> {
        http::post_json(
            &self.client,
            url,
            Some(&self.api_key),
            body,
            &self.config.model,
            self.config.max_retries,
        )
        .await
    }
}

fn choice_contents(response: ChatResponse) -> Vec<String> {
    response
        .choices
        .into_iter()
        .filter_map(|c| c.message.and_then(|m| m.content).or(c.text))
        .filter(|content| !content.is_empty())
        .collect()
}

impl Generator for OpenAiGenerator {
    type Error = LlmError;

    fn generate<'a>(&'a self, prompt: &'a GenerationPrompt) -> Completions<'a, Self::Error> {
        stream::once(self.complete(prompt))
            .map(|result| {
                let items: Vec<Result<String, LlmError>> = match result {
                    Ok(contents) => contents.into_iter().map(Ok).collect(),
                    Err(e) => vec![Err(e)],
                };
                stream::iter(items)
            })
            .flatten()
            .boxed()
    }
}
