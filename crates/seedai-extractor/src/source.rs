//! Function source lookup through an external parser program

use crate::error::ExtractorError;
use seedai_domain::SourceExtractor;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// Runs `<program> -func <name> -p <package> -code` and returns its output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserCommand {
    program: PathBuf,
    package: PathBuf,
}

impl ParserCommand {
    /// Parser binary and the package directory it should search
    pub fn new(program: impl Into<PathBuf>, package: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            package: package.into(),
        }
    }

    /// Parser binary
    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    /// Package directory
    pub fn package(&self) -> &PathBuf {
        &self.package
    }

    fn command(&self, function: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("-func")
            .arg(function)
            .arg("-p")
            .arg(&self.package)
            .arg("-code")
            .kill_on_drop(true);
        command
    }
}

impl SourceExtractor for ParserCommand {
    type Error = ExtractorError;

    async fn extract_source(&self, function: &str) -> Result<String, ExtractorError> {
        debug!("Running parser {} for '{}'", self.program.display(), function);

        let output = self
            .command(function)
            .output()
            .await
            .map_err(|source| ExtractorError::ParserSpawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExtractorError::ParserFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let source = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if source.is_empty() {
            return Err(ExtractorError::EmptySource(function.to_string()));
        }

        debug!("Parser returned {} bytes", source.len());
        Ok(source)
    }
}

/// Source text known ahead of time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSource(pub String);

impl SourceExtractor for StaticSource {
    type Error = ExtractorError;

    async fn extract_source(&self, function: &str) -> Result<String, ExtractorError> {
        let source = self.0.trim();
        if source.is_empty() {
            return Err(ExtractorError::EmptySource(function.to_string()));
        }
        Ok(source.to_string())
    }
}
