//! SeedAI CLI - Generate fuzzing seeds for a function with a language model.

use anyhow::Context;
use clap::Parser;
use seedai_cli::commands;
use seedai_cli::{Cli, CliError, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let args = match cli.command {
        Some(Command::Verify(args)) => {
            commands::execute_verify(args, &config, &formatter)?;
            return Ok(());
        }
        Some(Command::Generate(args)) => args,
        None => cli.generate,
    };

    // Command-line flags win over the config file
    config.apply_args(&args);
    let func = args
        .func
        .ok_or_else(|| CliError::InvalidInput("missing --func <NAME>".to_string()))?;

    commands::execute_generate(&func, config, &formatter)
        .await
        .with_context(|| format!("Seed generation for '{}' failed", func))
}

/// Log to stderr; `RUST_LOG` overrides the level chosen by `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
