//! SeedAI Generator Layer
//!
//! Text generation backends behind the `Generator` trait from `seedai-domain`.
//!
//! # Architecture
//!
//! Callers depend only on the `Generator` capability. [`Backend`] is the
//! closed set of real backends; [`MockGenerator`] serves tests.
//!
//! # Backends
//!
//! - `MockGenerator`: Deterministic completions for testing
//! - `OllamaGenerator`: Local model inference through Ollama
//! - `OpenAiGenerator`: Remote chat completions API
//!
//! # Examples
//!
//! ```
//! use futures::StreamExt;
//! use seedai_domain::{GenerationPrompt, Generator};
//! use seedai_llm::MockGenerator;
//!
//! # futures::executor::block_on(async {
//! let generator = MockGenerator::new(["\"abc\""]);
//! let prompt = GenerationPrompt::new(vec![1, 2, 3]);
//! let outputs: Vec<_> = generator.generate(&prompt).collect().await;
//! assert_eq!(outputs.len(), 1);
//! # });
//! ```

#![warn(missing_docs)]

mod http;
pub mod ollama;
pub mod openai;
pub mod tokenizer;

use futures::stream::{self, StreamExt};
use seedai_domain::{Completions, GenerationPrompt, Generator};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::{OllamaConfig, OllamaGenerator};
pub use openai::{OpenAiConfig, OpenAiGenerator};
pub use tokenizer::{TiktokenTokenizer, END_OF_TEXT, LEGACY_FINE_TUNE_STOP};

/// Errors that can occur during generation
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the backend
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// API credentials were not provided
    #[error("Missing API key (set {0})")]
    MissingApiKey(&'static str),

    /// Vocabulary could not be loaded or is unusable
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
}

/// The real generation backends
pub enum Backend {
    /// Local model through Ollama
    Ollama(OllamaGenerator),
    /// Remote OpenAI API
    OpenAi(OpenAiGenerator),
}

impl Backend {
    /// Short backend name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Ollama(_) => "ollama",
            Backend::OpenAi(_) => "openai",
        }
    }

    /// Model the backend talks to
    pub fn model(&self) -> &str {
        match self {
            Backend::Ollama(g) => &g.config().model,
            Backend::OpenAi(g) => &g.config().model,
        }
    }
}

impl Generator for Backend {
    type Error = LlmError;

    fn generate<'a>(&'a self, prompt: &'a GenerationPrompt) -> Completions<'a, Self::Error> {
        match self {
            Backend::Ollama(g) => g.generate(prompt),
            Backend::OpenAi(g) => g.generate(prompt),
        }
    }
}

/// Mock generator for deterministic testing
///
/// Yields the configured completions in order without any network calls.
/// Counters are shared between clones.
///
/// # Examples
///
/// ```
/// use seedai_llm::MockGenerator;
///
/// let generator = MockGenerator::new(["first", "second"]);
/// assert_eq!(generator.call_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockGenerator {
    completions: Vec<String>,
    failure: Option<String>,
    call_count: Arc<AtomicUsize>,
    pulled: Arc<AtomicUsize>,
    last_prompt: Arc<Mutex<Option<GenerationPrompt>>>,
}

impl MockGenerator {
    /// Create a generator that yields `completions`
    pub fn new<I, S>(completions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            completions: completions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Yield an error after the configured completions
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of times `generate` was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Number of completions consumers actually pulled
    pub fn pulled(&self) -> usize {
        self.pulled.load(Ordering::SeqCst)
    }

    /// The prompt passed to the latest `generate` call
    pub fn last_prompt(&self) -> Option<GenerationPrompt> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

impl Generator for MockGenerator {
    type Error = LlmError;

    fn generate<'a>(&'a self, prompt: &'a GenerationPrompt) -> Completions<'a, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.clone());
        }

        let mut items: Vec<Result<String, LlmError>> =
            self.completions.iter().cloned().map(Ok).collect();
        if let Some(message) = &self.failure {
            items.push(Err(LlmError::Communication(message.clone())));
        }

        let pulled = Arc::clone(&self.pulled);
        stream::iter(items)
            .inspect(move |_| {
                pulled.fetch_add(1, Ordering::SeqCst);
            })
            .boxed()
    }
}
