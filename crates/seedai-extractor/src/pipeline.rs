//! Seed generation pipeline
//!
//! ```text
//! source → TokenBudgetEncoder → Generator → extract → SeedStore
//! ```
//!
//! Completions are processed one at a time in the order the generator
//! yields them. The stream is dropped as soon as the seed target is met.

use crate::config::ExtractorConfig;
use crate::encoder::{EncodedPrompt, TokenBudgetEncoder};
use crate::error::ExtractorError;
use crate::types::RunSummary;
use futures::StreamExt;
use seedai_domain::{DiagnosticSink, GenerationPrompt, Generator, SourceExtractor, Tokenizer};
use seedai_store::SeedStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Turns function source into seed files
pub struct SeedPipeline<G: Generator> {
    generator: G,
    tokenizer: Arc<dyn Tokenizer>,
    encoder: TokenBudgetEncoder,
    store: SeedStore,
    config: ExtractorConfig,
    stop_text: Option<String>,
}

impl<G: Generator> SeedPipeline<G> {
    /// Create a pipeline writing into `store`
    ///
    /// Fails with [`ExtractorError::Config`] if `config` does not validate.
    pub fn new(
        generator: G,
        tokenizer: Arc<dyn Tokenizer>,
        store: SeedStore,
        config: ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        let stop_text = tokenizer.stop_text();

        Ok(Self {
            generator,
            encoder: TokenBudgetEncoder::new(Arc::clone(&tokenizer)),
            tokenizer,
            store,
            config,
            stop_text,
        })
    }

    /// The generator backend
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// The corpus
    pub fn store(&self) -> &SeedStore {
        &self.store
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Budgeted prompt for `source`
    ///
    /// The system segment shares the context window, so its tokens come out
    /// of the encode budget.
    pub fn encode(&self, source: &str) -> Result<EncodedPrompt, ExtractorError> {
        let system_len = self
            .config
            .template
            .system_tokens(self.tokenizer.as_ref())
            .map_or(0, |tokens| tokens.len());
        let request = self.config.template.encoding_request(
            self.tokenizer.as_ref(),
            source,
            self.config.max_encode_length().saturating_sub(system_len),
        );
        Ok(self.encoder.encode(&request)?)
    }

    /// Look up `function` with `extractor`, then [`run`](Self::run) on its source
    pub async fn run_for<S>(
        &self,
        extractor: &S,
        function: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<RunSummary, ExtractorError>
    where
        S: SourceExtractor,
        S::Error: Into<ExtractorError>,
    {
        info!("Parsing code for '{}'", function);
        let source = extractor.extract_source(function).await.map_err(Into::into)?;
        self.run(&source, sink).await
    }

    /// Generate seeds from function `source`
    pub async fn run(
        &self,
        source: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<RunSummary, ExtractorError> {
        self.store.ensure_dir()?;

        let encoded = self.encode(source)?;
        debug!(
            "Prompt is {} tokens (max encode length {})",
            encoded.len(),
            self.config.max_encode_length()
        );
        sink.prompt(&self.tokenizer.decode(encoded.tokens()));

        let mut summary = RunSummary {
            truncated: encoded.truncated(),
            ..RunSummary::default()
        };

        let mut prompt = GenerationPrompt::new(encoded.into_tokens());
        if let Some(system) = self.config.template.system_tokens(self.tokenizer.as_ref()) {
            prompt = prompt.with_system(system);
        }

        info!("Generating ...");
        let mut completions = self.generator.generate(&prompt);

        while let Some(completion) = completions.next().await {
            let completion = completion.map_err(|e| ExtractorError::Llm(Box::new(e)))?;
            let index = summary.completions;
            summary.completions += 1;
            sink.completion(index, &completion);

            let values = self
                .config
                .template
                .strategy
                .extract(trim_at_stop(&completion, self.stop_text.as_deref()));
            sink.values(index, &values);
            summary.values += values.len();

            summary.seeds_written += self.store.save(&values)?;
            info!("Generated {} initial seed files", summary.seeds_written);

            if summary.seeds_written >= self.config.seed_target {
                debug!("Seed target {} reached", self.config.seed_target);
                break;
            }
        }

        Ok(summary)
    }
}

/// `completion` up to the first occurrence of `stop`
pub fn trim_at_stop<'a>(completion: &'a str, stop: Option<&str>) -> &'a str {
    match stop.filter(|s| !s.is_empty()) {
        Some(stop) => completion
            .find(stop)
            .map_or(completion, |end| &completion[..end]),
        None => completion,
    }
}
