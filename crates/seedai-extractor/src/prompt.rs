//! Prompt templates and output extraction strategies

use crate::encoder::EncodingRequest;
use crate::parser::ValueExtractor;
use seedai_domain::{Token, Tokenizer};
use serde::{Deserialize, Serialize};

/// Split token placed after the source for fine-tuned causal models
pub const DEFAULT_SPLIT_TOKEN: &str = "\n\n###\n\n";

const LITERAL_SYSTEM: &str = "You write fuzzing seeds. Reply only with Go string \
literals that exercise the function below. Prefer short, unusual and boundary \
inputs. Do not explain.";

const FENCE_CLOSE: &str = "\n```\n";

/// How values are recovered from a completion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractStrategy {
    /// The whole non-empty completion is one value
    #[default]
    Verbatim,

    /// Delimited literals are scanned out of the completion
    Literal {
        /// Collect every literal on a line, not just the first
        #[serde(default)]
        multi_value: bool,

        /// Delimiter the prompt already opened
        #[serde(default)]
        leading_delimiter: Option<char>,
    },
}

impl ExtractStrategy {
    /// Values carried by `output`
    pub fn extract(&self, output: &str) -> Vec<String> {
        match self {
            ExtractStrategy::Verbatim => {
                if output.is_empty() {
                    Vec::new()
                } else {
                    vec![output.to_string()]
                }
            }
            ExtractStrategy::Literal {
                multi_value,
                leading_delimiter,
            } => ValueExtractor::new(*multi_value, *leading_delimiter).extract(output),
        }
    }
}

/// Scaffolding wrapped around the function source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplate {
    /// Instruction sent as a separate system message, when the backend has one
    pub system: Option<String>,

    /// Text before the source
    pub prefix: String,

    /// Wrap the source in a code fence tagged with this language
    pub fence: Option<String>,

    /// Text after the source
    pub suffix: String,

    /// Re-inserted after a truncated source
    pub guard: String,

    /// How completions are turned into values
    pub strategy: ExtractStrategy,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::fine_tune(DEFAULT_SPLIT_TOKEN)
    }
}

impl PromptTemplate {
    /// Source followed by a split token, for models trained on that format
    pub fn fine_tune(split: impl Into<String>) -> Self {
        Self {
            system: None,
            prefix: String::new(),
            fence: None,
            suffix: split.into(),
            guard: String::new(),
            strategy: ExtractStrategy::Verbatim,
        }
    }

    /// Fenced source, then an opened string literal for the model to finish
    pub fn single_literal() -> Self {
        Self {
            system: Some(LITERAL_SYSTEM.to_string()),
            prefix: String::new(),
            fence: Some("go".to_string()),
            suffix: "\n// A fuzzing seed for the function above:\nseed := \"".to_string(),
            guard: FENCE_CLOSE.to_string(),
            strategy: ExtractStrategy::Literal {
                multi_value: false,
                leading_delimiter: Some('"'),
            },
        }
    }

    /// Fenced source, then an opened list of string literals
    pub fn list_literal() -> Self {
        Self {
            system: Some(LITERAL_SYSTEM.to_string()),
            prefix: String::new(),
            fence: Some("go".to_string()),
            suffix: "\n// Fuzzing seeds for the function above:\nseeds := []string{".to_string(),
            guard: FENCE_CLOSE.to_string(),
            strategy: ExtractStrategy::Literal {
                multi_value: true,
                leading_delimiter: None,
            },
        }
    }

    /// Source as it appears in the prompt
    pub fn body(&self, source: &str) -> String {
        match &self.fence {
            Some(language) => format!("```{}\n{}{}", language, source, FENCE_CLOSE),
            None => source.to_string(),
        }
    }

    /// Encoder input for `source` within `max_total_length` tokens
    pub fn encoding_request(
        &self,
        tokenizer: &dyn Tokenizer,
        source: &str,
        max_total_length: usize,
    ) -> EncodingRequest {
        EncodingRequest {
            body_text: self.body(source),
            max_total_length,
            prefix_tokens: tokenizer.encode(&self.prefix, None),
            suffix_tokens: tokenizer.encode(&self.suffix, None),
            guard_tokens: tokenizer.encode(&self.guard, None),
        }
    }

    /// Encoded system instruction, if any
    pub fn system_tokens(&self, tokenizer: &dyn Tokenizer) -> Option<Vec<Token>> {
        self.system
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| tokenizer.encode(s, None))
    }
}
