//! SeedAI Domain Layer
//!
//! This crate contains the vocabulary shared by every other SeedAI crate:
//! tokens, the tokenizer seam, and the traits for the pipeline's external
//! collaborators.
//!
//! ## Key Concepts
//!
//! - **Token**: an opaque vocabulary identifier
//! - **Tokenizer**: turns text into tokens and back, with one stop token
//! - **Generator**: yields raw completions for an encoded prompt
//! - **SourceExtractor**: finds the source text of a function
//! - **DiagnosticSink**: optional receiver for debug records
//!
//! ## Architecture
//!
//! - Pure types and traits only
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod token;
pub mod traits;

// Re-exports for convenience
pub use token::{ByteTokenizer, Token, Tokenizer};
pub use traits::{
    Completions, DiagnosticSink, GenerationPrompt, Generator, NoopSink, SourceExtractor,
};
