//! Ollama Generator Implementation
//!
//! Runs a local model through Ollama's HTTP API. The prompt is sent in raw
//! mode so the model continues the encoded text exactly, without a chat
//! template wrapped around it. Raw mode ignores Ollama's `system` field, so a
//! system segment is written in front of the prompt, separated by a blank line.
//!
//! Each candidate is one `/api/generate` request, issued only when the
//! consumer pulls the next item from the completion stream.
//!
//! # Examples
//!
//! ```no_run
//! use seedai_llm::{OllamaConfig, OllamaGenerator};
//! use seedai_domain::ByteTokenizer;
//! use std::sync::Arc;
//!
//! let config = OllamaConfig {
//!     model: "codellama:7b-code".to_string(),
//!     ..OllamaConfig::default()
//! };
//! let generator = OllamaGenerator::new(config, Arc::new(ByteTokenizer)).unwrap();
//! ```

use crate::{http, LlmError};
use futures::stream::{self, StreamExt};
use seedai_domain::{Completions, GenerationPrompt, Generator, Tokenizer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for one generation request (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Settings for the Ollama backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// API endpoint. Default: `http://localhost:11434`
    pub endpoint: String,

    /// Model tag. Default: `codellama`
    pub model: String,

    /// Number of candidates to produce. Default: 10
    pub count: usize,

    /// Sampling temperature. Default: 0.2
    pub temperature: f32,

    /// Penalty for repeated tokens. Default: 2.0
    pub repeat_penalty: f32,

    /// Penalty for tokens already present. Default: 2.0
    pub presence_penalty: f32,

    /// Maximum tokens to generate per candidate; `None` lets the server decide
    pub num_predict: Option<u32>,

    /// Extra stop sequences (the tokenizer's stop text is always added)
    pub stop: Vec<String>,

    /// Request timeout in seconds. Default: 120
    pub timeout_secs: u64,

    /// Attempts per request. Default: 3
    pub max_retries: u32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: "codellama".to_string(),
            count: 10,
            temperature: 0.2,
            repeat_penalty: 2.0,
            presence_penalty: 2.0,
            num_predict: None,
            stop: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Ollama API generator for local model inference
pub struct OllamaGenerator {
    config: OllamaConfig,
    tokenizer: Arc<dyn Tokenizer>,
    client: reqwest::Client,
}

/// Request body for Ollama generate API
#[derive(Debug, Clone, Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    raw: bool,
    options: OllamaOptions,
}

#[derive(Debug, Clone, Serialize)]
struct OllamaOptions {
    temperature: f32,
    repeat_penalty: f32,
    presence_penalty: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaGenerator {
    /// Create a new Ollama generator
    ///
    /// `tokenizer` decodes prompt tokens back into the text sent to the server.
    pub fn new(config: OllamaConfig, tokenizer: Arc<dyn Tokenizer>) -> Result<Self, LlmError> {
        let client = http::client(config.timeout_secs)?;
        Ok(Self {
            config,
            tokenizer,
            client,
        })
    }

    /// Backend settings
    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn request_body(&self, prompt: &GenerationPrompt) -> OllamaGenerateRequest {
        let mut stop = self.config.stop.clone();
        if let Some(text) = self.tokenizer.stop_text() {
            stop.push(text);
        }

        let user = self.tokenizer.decode(&prompt.user);
        let text = match &prompt.system {
            Some(system) => format!("{}\n\n{}", self.tokenizer.decode(system), user),
            None => user,
        };

        OllamaGenerateRequest {
            model: self.config.model.clone(),
            prompt: text,
            stream: false,
            raw: true,
            options: OllamaOptions {
                temperature: self.config.temperature,
                repeat_penalty: self.config.repeat_penalty,
                presence_penalty: self.config.presence_penalty,
                num_predict: self.config.num_predict,
                stop,
            },
        }
    }

    async fn complete_once(&self, body: &OllamaGenerateRequest) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.config.endpoint);
        let response: OllamaGenerateResponse = http::post_json(
            &self.client,
            &url,
            None,
            body,
            &self.config.model,
            self.config.max_retries,
        )
        .await?;
        Ok(response.response)
    }
}

impl Generator for OllamaGenerator {
    type Error = LlmError;

    fn generate<'a>(&'a self, prompt: &'a GenerationPrompt) -> Completions<'a, Self::Error> {
        let body = self.request_body(prompt);

        stream::unfold((body, 0usize), move |(body, index)| async move {
            if index >= self.config.count {
                return None;
            }
            debug!("Requesting candidate {}/{}", index + 1, self.config.count);
            let result = self.complete_once(&body).await;
            Some((result, (body, index + 1)))
        })
        .boxed()
    }
}
