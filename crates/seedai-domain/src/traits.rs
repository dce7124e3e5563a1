//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the seed pipeline and its
//! collaborators. Infrastructure implementations live in other crates.

use crate::token::Token;
use futures::stream::BoxStream;
use std::future::Future;

/// Encoded input handed to a generator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationPrompt {
    /// Optional system segment (chat backends send it as its own message)
    pub system: Option<Vec<Token>>,

    /// The budgeted prompt tokens
    pub user: Vec<Token>,
}

impl GenerationPrompt {
    /// Prompt without a system segment
    pub fn new(user: Vec<Token>) -> Self {
        Self { system: None, user }
    }

    /// Attach a system segment
    pub fn with_system(mut self, system: Vec<Token>) -> Self {
        self.system = Some(system);
        self
    }
}

/// Lazy, finite, non-restartable sequence of raw completions
pub type Completions<'a, E> = BoxStream<'a, Result<String, E>>;

/// Trait for text generation backends
///
/// Implemented by the infrastructure layer (seedai-llm). Dropping the returned
/// stream cancels any remaining work.
pub trait Generator: Send + Sync {
    /// Error type for generation
    type Error: std::error::Error + Send + Sync + 'static;

    /// Produce candidate completions for `prompt`
    fn generate<'a>(&'a self, prompt: &'a GenerationPrompt) -> Completions<'a, Self::Error>;
}

/// Trait for locating the source text of a function
///
/// Implemented by the application layer (seedai-extractor)
pub trait SourceExtractor {
    /// Error type for source extraction
    type Error;

    /// Return the source of `function`; an empty result is an error
    fn extract_source(
        &self,
        function: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

/// Receiver for debug records produced during a run
///
/// All methods default to doing nothing.
pub trait DiagnosticSink {
    /// The decoded prompt sent to the generator
    fn prompt(&mut self, _text: &str) {}

    /// One raw completion, by yield index
    fn completion(&mut self, _index: usize, _text: &str) {}

    /// Values extracted from completion `index`
    fn values(&mut self, _index: usize, _values: &[String]) {}
}

/// Sink used when diagnostics are disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {}
