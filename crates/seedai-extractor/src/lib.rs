//! SeedAI Extractor
//!
//! Turns the source of one function into fuzzing seeds by round-tripping it
//! through a text generator.
//!
//! # Architecture
//!
//! ```text
//! Parser → TokenBudgetEncoder → Generator → ValueExtractor → SeedStore
//! ```
//!
//! # Key Features
//!
//! - **Token budgeting**: Prompts always fit the model window; only the tail
//!   of the function source is ever dropped
//! - **Literal extraction**: Quoted and backtick values are recovered from
//!   free-form, possibly fenced, multi-line completions
//! - **Lenient unescaping**: Malformed escapes keep the raw value
//! - **Content addressing**: Seeds are stored under the SHA1 of their bytes
//!
//! # Example Usage
//!
//! ```no_run
//! use seedai_domain::{ByteTokenizer, NoopSink};
//! use seedai_extractor::{ExtractorConfig, ParserCommand, SeedPipeline};
//! use seedai_llm::MockGenerator;
//! use seedai_store::SeedStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let generator = MockGenerator::new(["\"seed one\"", "`seed two`"]);
//! let pipeline = SeedPipeline::new(
//!     generator,
//!     Arc::new(ByteTokenizer),
//!     SeedStore::new("corpus"),
//!     ExtractorConfig::chat(),
//! )?;
//!
//! let parser = ParserCommand::new("go-parser", "./pkg");
//! let summary = pipeline.run_for(&parser, "FuzzParse", &mut NoopSink).await?;
//!
//! println!("Wrote {} seeds", summary.seeds_written);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod diagnostics;
mod encoder;
mod error;
mod escape;
mod parser;
mod pipeline;
mod prompt;
mod source;
mod types;


pub use config::{ExtractorConfig, CHAT_ROLE_OVERHEAD_TOKENS};
pub use diagnostics::FileSink;
pub use encoder::{EncodeError, EncodedPrompt, EncodingRequest, TokenBudgetEncoder};
pub use error::ExtractorError;
pub use escape::{decode_escapes, try_decode_escapes, EscapeError};
pub use parser::{extract_values, values_in_line, ValueExtractor, DELIMITERS};
pub use pipeline::{trim_at_stop, SeedPipeline};
pub use prompt::{ExtractStrategy, PromptTemplate, DEFAULT_SPLIT_TOKEN};
pub use source::{ParserCommand, StaticSource};
pub use types::RunSummary;
