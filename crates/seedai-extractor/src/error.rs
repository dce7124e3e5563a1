//! Error types for the seed pipeline

use crate::encoder::EncodeError;
use seedai_store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating seeds
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Prompt could not be fitted into the token budget
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Generator backend error, kept whole so callers can downcast it
    #[error("Generator error: {0}")]
    Llm(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Corpus write error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The source parser could not be started
    #[error("Failed to run parser '{program}': {source}")]
    ParserSpawn {
        /// Parser executable
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The source parser exited unsuccessfully
    #[error("Parser error ({status}): {stderr}")]
    ParserFailed {
        /// Exit status as reported by the OS
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// The source parser printed nothing
    #[error("Parser returned empty result for '{0}'")]
    EmptySource(String),

    /// The diagnostic file could not be opened
    #[error("Failed to open debug file {}: {source}", path.display())]
    Diagnostics {
        /// Debug file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
