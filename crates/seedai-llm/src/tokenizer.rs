//! BPE tokenizer for OpenAI models

use crate::LlmError;
use seedai_domain::{Token, Tokenizer};
use tiktoken_rs::CoreBPE;

/// End-of-text marker shared by the OpenAI vocabularies
pub const END_OF_TEXT: &str = "<|endoftext|>";

/// Stop marker of the default legacy fine-tune format
pub const LEGACY_FINE_TUNE_STOP: &str = " END";

/// Tokenizer backed by `tiktoken-rs`
pub struct TiktokenTokenizer {
    bpe: CoreBPE,
    stop_token: Token,
    stop_text: String,
}

impl TiktokenTokenizer {
    /// Load the vocabulary used by `model`
    ///
    /// Fails when the model is unknown or its end-of-text marker is not a
    /// single token.
    pub fn for_model(model: &str) -> Result<Self, LlmError> {
        Self::with_stop(model, END_OF_TEXT)
    }

    /// Load the vocabulary for a legacy model name
    ///
    /// A fine-tuned name `base:suffix` uses the vocabulary of `base` and stops
    /// at [`LEGACY_FINE_TUNE_STOP`]; a plain name behaves like
    /// [`for_model`](Self::for_model).
    pub fn for_legacy_model(model: &str) -> Result<Self, LlmError> {
        match model.split_once(':') {
            Some((base, _)) => Self::with_stop(base, LEGACY_FINE_TUNE_STOP),
            None => Self::for_model(model),
        }
    }

    fn with_stop(model: &str, stop_text: &str) -> Result<Self, LlmError> {
        let bpe = tiktoken_rs::get_bpe_from_model(model)
            .map_err(|e| LlmError::Tokenizer(format!("No vocabulary for '{}': {}", model, e)))?;

        let stop = bpe.encode_with_special_tokens(stop_text);
        if stop.len() != 1 {
            return Err(LlmError::Tokenizer(format!(
                "Stop marker {:?} encodes to {} tokens, expected 1",
                stop_text,
                stop.len()
            )));
        }

        Ok(Self {
            stop_token: stop[0],
            stop_text: stop_text.to_string(),
            bpe,
        })
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn encode(&self, text: &str, max_len: Option<usize>) -> Vec<Token> {
        let mut tokens = self.bpe.encode_ordinary(text);
        if let Some(max_len) = max_len {
            tokens.truncate(max_len);
        }
        tokens
    }

    fn decode(&self, tokens: &[Token]) -> String {
        // A truncated sequence can end inside a multi-byte character; drop
        // trailing tokens until the rest decodes.
        let mut end = tokens.len();
        while end > 0 {
            if let Ok(text) = self.bpe.decode(tokens[..end].to_vec()) {
                return text;
            }
            end -= 1;
        }
        String::new()
    }

    fn stop_token(&self) -> Token {
        self.stop_token
    }

    fn stop_text(&self) -> Option<String> {
        Some(self.stop_text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_model() {
        let result = TiktokenTokenizer::for_model("definitely-not-a-model");
        assert!(matches!(result, Err(LlmError::Tokenizer(_))));
    }

    #[test]
    fn test_round_trip_and_truncation() {
        let tokenizer = TiktokenTokenizer::for_model("gpt-4").unwrap();
        let text = "func FuzzParse(data []byte) int { return 0 }";

        let tokens = tokenizer.encode(text, None);
        assert_eq!(tokenizer.decode(&tokens), text);

        let truncated = tokenizer.encode(text, Some(3));
        assert_eq!(truncated.len(), 3);
        assert_eq!(truncated[..], tokens[..3]);
    }

    #[test]
    fn test_stop_token_is_single() {
        let tokenizer = TiktokenTokenizer::for_model("gpt-3.5-turbo").unwrap();
        assert_eq!(tokenizer.stop_text().as_deref(), Some(END_OF_TEXT));
        assert_eq!(tokenizer.decode(&[tokenizer.stop_token()]), END_OF_TEXT);
    }

    #[test]
    fn test_legacy_fine_tuned_model_stops_at_end_marker() {
        let tokenizer = TiktokenTokenizer::for_legacy_model("davinci:ft-acme-2023-05-01").unwrap();
        assert_eq!(tokenizer.stop_text().as_deref(), Some(LEGACY_FINE_TUNE_STOP));
        assert_eq!(tokenizer.decode(&[tokenizer.stop_token()]), LEGACY_FINE_TUNE_STOP);
    }

    #[test]
    fn test_legacy_base_model_keeps_end_of_text() {
        let tokenizer = TiktokenTokenizer::for_legacy_model("davinci").unwrap();
        assert_eq!(tokenizer.stop_text().as_deref(), Some(END_OF_TEXT));
    }
}
