//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// SeedAI - Generate fuzzing seeds for a function with a language model.
#[derive(Debug, Parser)]
#[command(name = "seedai")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Output format
    #[arg(long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub generate: GenerateArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable text (default)
    Text,
    /// JSON format
    Json,
    /// Quiet format (counts only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate seeds (the default when no command is given)
    Generate(GenerateArgs),

    /// Check that every corpus entry is named by the SHA1 of its content
    Verify(VerifyArgs),
}

/// Arguments for seed generation.
#[derive(Debug, Clone, Default, Args)]
pub struct GenerateArgs {
    /// Parser executable that prints a function's source
    #[arg(short, long)]
    pub parser: Option<PathBuf>,

    /// Function to generate seeds for
    #[arg(short, long)]
    pub func: Option<String>,

    /// Package directory passed to the parser
    #[arg(long)]
    pub package: Option<PathBuf>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Generator backend
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Backend endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Model architecture; seq2seq models get the whole window and no split token
    #[arg(short = 't', long = "type", value_enum)]
    pub model_type: Option<ModelTypeArg>,

    /// Model context length in tokens
    #[arg(short, long)]
    pub length: Option<usize>,

    /// Completions requested per generation call
    #[arg(short, long)]
    pub count: Option<usize>,

    /// Stop after this many new seeds
    #[arg(long)]
    pub target: Option<usize>,

    /// Corpus directory
    #[arg(short = 'd', long)]
    pub corpus: Option<PathBuf>,

    /// Prompt format
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Split token appended to the source in fine-tune mode
    #[arg(short, long)]
    pub split_token: Option<String>,

    /// Append prompts, completions and extracted values to this file
    #[arg(long)]
    pub debug_file: Option<PathBuf>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Use OpenAI's legacy completions API (fine-tuned `base:ft-...` models)
    #[arg(short = 'L', long)]
    pub legacy: bool,
}

/// Arguments for the verify command.
#[derive(Debug, Clone, Default, Args)]
pub struct VerifyArgs {
    /// Corpus directory
    #[arg(short = 'd', long)]
    pub corpus: Option<PathBuf>,
}

/// Backend argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendArg {
    /// Local Ollama server
    Ollama,
    /// OpenAI chat completions API
    #[value(name = "openai")]
    OpenAi,
}

/// Model architecture argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModelTypeArg {
    /// Decoder-only model; a quarter of the window is left for output
    Causal,
    /// Encoder-decoder model
    Seq2seq,
}

/// Prompt mode argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    /// Source plus split token; the completion is the seed
    FineTune,
    /// Model completes one opened string literal
    Literal,
    /// Model completes an opened list of string literals
    List,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => crate::config::OutputFormat::Text,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<BackendArg> for crate::config::BackendKind {
    fn from(backend: BackendArg) -> Self {
        match backend {
            BackendArg::Ollama => crate::config::BackendKind::Ollama,
            BackendArg::OpenAi => crate::config::BackendKind::OpenAi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_generate() {
        let cli = Cli::parse_from(["seedai", "-p", "./parser", "-f", "FuzzParse", "-c", "5"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.generate.func.as_deref(), Some("FuzzParse"));
        assert_eq!(cli.generate.parser, Some(PathBuf::from("./parser")));
        assert_eq!(cli.generate.count, Some(5));
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::parse_from([
            "seedai", "-m", "gpt-4", "-l", "4096", "-d", "out", "-s", "END", "-v",
        ]);
        assert_eq!(cli.generate.model.as_deref(), Some("gpt-4"));
        assert_eq!(cli.generate.length, Some(4096));
        assert_eq!(cli.generate.corpus, Some(PathBuf::from("out")));
        assert_eq!(cli.generate.split_token.as_deref(), Some("END"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_value_enums() {
        let cli = Cli::parse_from(["seedai", "--backend", "openai", "--mode", "fine-tune"]);
        assert_eq!(cli.generate.backend, Some(BackendArg::OpenAi));
        assert_eq!(cli.generate.mode, Some(ModeArg::FineTune));

        let cli = Cli::parse_from(["seedai", "--backend", "ollama", "--mode", "list"]);
        assert_eq!(cli.generate.backend, Some(BackendArg::Ollama));
        assert_eq!(cli.generate.mode, Some(ModeArg::List));
    }

    #[test]
    fn test_type_and_legacy_flags() {
        let cli = Cli::parse_from(["seedai", "-t", "seq2seq", "-L"]);
        assert_eq!(cli.generate.model_type, Some(ModelTypeArg::Seq2seq));
        assert!(cli.generate.legacy);

        let cli = Cli::parse_from(["seedai", "--type", "causal"]);
        assert_eq!(cli.generate.model_type, Some(ModelTypeArg::Causal));
        assert!(!cli.generate.legacy);
        assert!(Cli::try_parse_from(["seedai", "--type", "encoder"]).is_err());
    }

    #[test]
    fn test_verify_command() {
        let cli = Cli::parse_from(["seedai", "verify", "-d", "corpus"]);
        match cli.command {
            Some(Command::Verify(args)) => assert_eq!(args.corpus, Some(PathBuf::from("corpus"))),
            _ => panic!("Expected Verify command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["seedai", "verify", "--format", "json", "--no-color"]);
        assert_eq!(cli.format, Some(CliFormat::Json));
        assert!(cli.no_color);
    }

    #[test]
    fn test_invalid_backend_rejected() {
        assert!(Cli::try_parse_from(["seedai", "--backend", "hf"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
