//! Generate command implementation.

use crate::config::{BackendKind, Config};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use seedai_domain::{ByteTokenizer, DiagnosticSink, NoopSink, Tokenizer};
use seedai_extractor::{FileSink, ParserCommand, SeedPipeline};
use seedai_llm::{Backend, OllamaGenerator, OpenAiGenerator, TiktokenTokenizer};
use seedai_store::SeedStore;
use std::sync::Arc;
use tracing::info;

/// Execute the generate command.
///
/// `config` already has command-line overrides applied.
pub async fn execute_generate(func: &str, config: Config, formatter: &Formatter) -> Result<()> {
    if func.is_empty() {
        return Err(CliError::InvalidInput("function name must not be empty".to_string()));
    }

    info!("Loading model {} ({:?}) ...", config.model(), config.generation.backend);
    let tokenizer = tokenizer_for(&config)?;
    let backend = backend_for(&config, Arc::clone(&tokenizer))?;

    info!("Model max length: {}", config.extractor.context_length);
    info!("Max encode length: {}", config.extractor.max_encode_length());

    let corpus = config.generation.corpus.clone();
    let parser = ParserCommand::new(&config.generation.parser, &config.generation.package);

    let mut sink: Box<dyn DiagnosticSink> = match &config.generation.debug_file {
        Some(path) => Box::new(FileSink::create(path)?),
        None => Box::new(NoopSink),
    };

    let pipeline = SeedPipeline::new(backend, tokenizer, SeedStore::new(&corpus), config.extractor)?;
    let summary = pipeline.run_for(&parser, func, sink.as_mut()).await?;

    println!("{}", formatter.format_summary(&summary, &corpus)?);
    Ok(())
}

/// Vocabulary used for budgeting the prompt
///
/// Ollama takes text, so the byte tokenizer gives an upper bound on the
/// model's token count.
fn tokenizer_for(config: &Config) -> Result<Arc<dyn Tokenizer>> {
    match config.generation.backend {
        BackendKind::Ollama => Ok(Arc::new(ByteTokenizer)),
        BackendKind::OpenAi if config.openai.legacy => {
            Ok(Arc::new(TiktokenTokenizer::for_legacy_model(&config.openai.model)?))
        }
        BackendKind::OpenAi => Ok(Arc::new(TiktokenTokenizer::for_model(&config.openai.model)?)),
    }
}

fn backend_for(config: &Config, tokenizer: Arc<dyn Tokenizer>) -> Result<Backend> {
    let backend = match config.generation.backend {
        BackendKind::Ollama => Backend::Ollama(OllamaGenerator::new(config.ollama.clone(), tokenizer)?),
        BackendKind::OpenAi => Backend::OpenAi(OpenAiGenerator::new(config.openai.clone(), tokenizer)?),
    };
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use seedai_llm::LlmError;

    #[test]
    fn test_openai_requires_api_key() {
        let mut config = Config::default();
        config.generation.backend = BackendKind::OpenAi;
        config.openai.api_key = None;

        let tokenizer: Arc<dyn Tokenizer> = Arc::new(ByteTokenizer);
        let result = backend_for(&config, tokenizer);
        assert!(matches!(result, Err(CliError::Llm(LlmError::MissingApiKey(_)))));
    }

    #[test]
    fn test_ollama_backend() {
        let config = Config::default();
        let tokenizer = tokenizer_for(&config).unwrap();
        let backend = backend_for(&config, tokenizer).unwrap();
        assert_eq!(backend.name(), "ollama");
    }

    #[test]
    fn test_unknown_openai_model() {
        let mut config = Config::default();
        config.generation.backend = BackendKind::OpenAi;
        config.openai.model = "not-a-model".to_string();

        assert!(matches!(tokenizer_for(&config), Err(CliError::Llm(LlmError::Tokenizer(_)))));
    }

    #[test]
    fn test_legacy_fine_tuned_model_tokenizer() {
        let mut config = Config::default();
        config.generation.backend = BackendKind::OpenAi;
        config.openai.legacy = true;
        config.openai.model = "davinci:ft-acme-2023-05-01".to_string();

        let tokenizer = tokenizer_for(&config).unwrap();
        assert_eq!(tokenizer.stop_text().as_deref(), Some(seedai_llm::LEGACY_FINE_TUNE_STOP));
    }

    #[tokio::test]
    async fn test_missing_parser_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.generation.parser = dir.path().join("no-such-parser");
        config.generation.corpus = dir.path().join("corpus");

        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let result = execute_generate("FuzzParse", config, &formatter).await;

        assert!(matches!(
            result,
            Err(CliError::Extractor(seedai_extractor::ExtractorError::ParserSpawn { .. }))
        ));
    }
}
