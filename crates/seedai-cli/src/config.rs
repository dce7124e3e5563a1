//! Configuration management for the CLI.

use crate::cli::{GenerateArgs, ModeArg, ModelTypeArg};
use crate::error::{CliError, Result};
use seedai_extractor::{ExtractStrategy, ExtractorConfig, PromptTemplate, CHAT_ROLE_OVERHEAD_TOKENS};
use seedai_llm::{OllamaConfig, OpenAiConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// What to generate for and where to put it
    #[serde(default)]
    pub generation: Generation,

    /// Prompt budget and extraction
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Ollama backend settings
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// OpenAI backend settings
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Run target settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Generation {
    /// Parser executable
    pub parser: PathBuf,

    /// Package directory passed to the parser
    pub package: PathBuf,

    /// Corpus directory
    pub corpus: PathBuf,

    /// Generator backend
    pub backend: BackendKind,

    /// Debug record file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_file: Option<PathBuf>,
}

/// Generator backend choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Local Ollama server
    #[default]
    Ollama,
    /// OpenAI chat completions API
    OpenAi,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".seedai").join("config.toml"))
    }

    /// Load configuration from `path`, or from the default path if it exists.
    ///
    /// An explicitly given file must exist; a missing default file yields
    /// the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Override file settings with command-line flags.
    pub fn apply_args(&mut self, args: &GenerateArgs) {
        if let Some(parser) = &args.parser {
            self.generation.parser = parser.clone();
        }
        if let Some(package) = &args.package {
            self.generation.package = package.clone();
        }
        if let Some(corpus) = &args.corpus {
            self.generation.corpus = corpus.clone();
        }
        if let Some(backend) = args.backend {
            self.generation.backend = backend.into();
        }
        if let Some(debug_file) = &args.debug_file {
            self.generation.debug_file = Some(debug_file.clone());
        }

        if let Some(model) = &args.model {
            self.ollama.model = model.clone();
            self.openai.model = model.clone();
        }
        if let Some(endpoint) = &args.endpoint {
            self.ollama.endpoint = endpoint.clone();
            self.openai.endpoint = endpoint.clone();
        }
        if let Some(count) = args.count {
            self.ollama.count = count;
            self.openai.count = count;
        }
        if let Some(api_key) = &args.api_key {
            self.openai.api_key = Some(api_key.clone());
        }
        if args.legacy {
            self.openai.legacy = true;
        }

        if let Some(length) = args.length {
            self.extractor.context_length = length;
        }
        if let Some(target) = args.target {
            self.extractor.seed_target = target;
        }
        if let Some(mode) = args.mode {
            self.extractor.template = match mode {
                ModeArg::FineTune => PromptTemplate::default(),
                ModeArg::Literal => PromptTemplate::single_literal(),
                ModeArg::List => PromptTemplate::list_literal(),
            };
        }
        if let Some(split) = &args.split_token {
            if self.extractor.template.strategy == ExtractStrategy::Verbatim {
                self.extractor.template.suffix = split.clone();
            }
        }
        match args.model_type {
            Some(ModelTypeArg::Causal) => {
                self.extractor.generation_reserve = ExtractorConfig::causal().generation_reserve;
            }
            Some(ModelTypeArg::Seq2seq) => {
                let preset = ExtractorConfig::seq2seq();
                self.extractor.generation_reserve = preset.generation_reserve;
                // seq2seq models take no split token, even an explicit one
                if self.extractor.template.strategy == ExtractStrategy::Verbatim {
                    self.extractor.template.suffix = preset.template.suffix;
                }
            }
            None => {}
        }

        // Legacy completions carry no chat role framing
        if self.generation.backend == BackendKind::OpenAi && !self.openai.legacy {
            self.extractor.role_overhead_tokens =
                self.extractor.role_overhead_tokens.max(CHAT_ROLE_OVERHEAD_TOKENS);
        }
    }

    /// Model name for the selected backend.
    pub fn model(&self) -> &str {
        match self.generation.backend {
            BackendKind::Ollama => &self.ollama.model,
            BackendKind::OpenAi => &self.openai.model,
        }
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self {
            parser: PathBuf::from("./parser"),
            package: PathBuf::from("."),
            corpus: PathBuf::from("./corpus"),
            backend: BackendKind::Ollama,
            debug_file: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Text,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}
