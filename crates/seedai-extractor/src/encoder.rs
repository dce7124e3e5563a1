//! Token-budget prompt encoding
//!
//! Packs fixed prefix and suffix scaffolding around a variable-length body so
//! that the result never exceeds the model window. Only the body is ever
//! truncated, and always from the tail, so identical inputs truncate
//! identically.

use seedai_domain::{Token, Tokenizer};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur while encoding a prompt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Prefix, suffix and guard leave no room for the body
    #[error("Encode length too small: {max_total_length} tokens with {reserved} reserved for prefix/suffix/guard")]
    Budget {
        /// Requested window size
        max_total_length: usize,
        /// Tokens taken by the fixed decorations
        reserved: usize,
    },

    /// The assembled prompt is longer than the window
    #[error("Encoded length too large: {length} tokens (max: {max_total_length})")]
    Overflow {
        /// Assembled length
        length: usize,
        /// Requested window size
        max_total_length: usize,
    },
}

/// Input to [`TokenBudgetEncoder::encode`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingRequest {
    /// Variable-length text; the only part that may be truncated
    pub body_text: String,

    /// Hard upper bound on the encoded length
    pub max_total_length: usize,

    /// Tokens placed before the body
    pub prefix_tokens: Vec<Token>,

    /// Tokens placed after the body
    pub suffix_tokens: Vec<Token>,

    /// Marker re-inserted after a truncated body (e.g. a closing fence)
    pub guard_tokens: Vec<Token>,
}

/// Budgeted token sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPrompt {
    tokens: Vec<Token>,
    truncated: bool,
}

impl EncodedPrompt {
    /// The encoded tokens
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Consume into the token vector
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Encoded length
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the prompt has no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether the body filled its whole budget
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

/// Fits prompts into a fixed-size token window
#[derive(Clone)]
pub struct TokenBudgetEncoder {
    tokenizer: Arc<dyn Tokenizer>,
}

impl TokenBudgetEncoder {
    /// Create an encoder using `tokenizer` for the body text
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { tokenizer }
    }

    /// Encode `request` as `prefix ++ body ++ [guard] ++ suffix`
    ///
    /// The guard is inserted only when the body used its whole budget and
    /// does not already end with the guard.
    pub fn encode(&self, request: &EncodingRequest) -> Result<EncodedPrompt, EncodeError> {
        let reserved = request.prefix_tokens.len()
            + request.suffix_tokens.len()
            + request.guard_tokens.len();
        if request.max_total_length <= reserved {
            return Err(EncodeError::Budget {
                max_total_length: request.max_total_length,
                reserved,
            });
        }
        let max_body_length = request.max_total_length - reserved;

        let mut body = self
            .tokenizer
            .encode(&request.body_text, Some(max_body_length));
        // Tokenizers may ignore the limit; keep the leading tokens regardless
        body.truncate(max_body_length);

        let truncated = body.len() >= max_body_length;
        let needs_guard = truncated
            && !request.guard_tokens.is_empty()
            && !body.ends_with(&request.guard_tokens);

        let mut tokens = Vec::with_capacity(request.max_total_length);
        tokens.extend_from_slice(&request.prefix_tokens);
        tokens.append(&mut body);
        if needs_guard {
            tokens.extend_from_slice(&request.guard_tokens);
        }
        tokens.extend_from_slice(&request.suffix_tokens);

        if tokens.len() > request.max_total_length {
            return Err(EncodeError::Overflow {
                length: tokens.len(),
                max_total_length: request.max_total_length,
            });
        }

        if truncated {
            warn!(
                "Input length >= max encode length ({} tokens), prompt truncated",
                request.max_total_length
            );
        }

        Ok(EncodedPrompt { tokens, truncated })
    }
}
