//! Verify command implementation.

use crate::cli::VerifyArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use seedai_store::SeedStore;
use tracing::debug;

/// Execute the verify command.
///
/// Fails when any entry is not named by the SHA1 of its content.
pub fn execute_verify(args: VerifyArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let corpus = args.corpus.unwrap_or_else(|| config.generation.corpus.clone());
    let store = SeedStore::new(&corpus);

    let entries = store.entries()?;
    debug!("Checking {} entries in {}", entries.len(), corpus.display());
    let mismatched = store.verify()?;

    println!("{}", formatter.format_verify(&corpus, entries.len(), &mismatched)?);

    if mismatched.is_empty() {
        Ok(())
    } else {
        Err(CliError::InvalidInput(format!(
            "{} corrupt corpus entries",
            mismatched.len()
        )))
    }
}
