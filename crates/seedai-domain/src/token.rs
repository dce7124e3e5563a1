//! Token module - vocabulary-agnostic token identifiers and the tokenizer seam

/// An opaque identifier from a fixed vocabulary
///
/// Token sequences are only meaningful under the tokenizer that produced them.
pub type Token = u32;

/// Trait for turning text into tokens and back
///
/// Implemented by the infrastructure layer (seedai-llm) or by
/// [`ByteTokenizer`] when no model vocabulary is available.
pub trait Tokenizer: Send + Sync {
    /// Tokenize `text`, keeping at most `max_len` leading tokens when set
    fn encode(&self, text: &str, max_len: Option<usize>) -> Vec<Token>;

    /// Turn tokens back into text
    fn decode(&self, tokens: &[Token]) -> String;

    /// The single token that marks the end of a generated output
    fn stop_token(&self) -> Token;

    /// Textual form of the stop token, if it has one
    fn stop_text(&self) -> Option<String> {
        let text = self.decode(&[self.stop_token()]);
        (!text.is_empty()).then_some(text)
    }
}

/// Tokenizer with one token per UTF-8 byte
///
/// Tokens `0..=255` are bytes; [`ByteTokenizer::STOP`] sits just outside the
/// byte range and decodes to nothing. Bytes that do not form valid UTF-8,
/// such as half of a character cut off by `max_len`, are dropped on decode.
///
/// # Examples
///
/// ```
/// use seedai_domain::{ByteTokenizer, Tokenizer};
///
/// let tokenizer = ByteTokenizer;
/// let tokens = tokenizer.encode("hello", Some(3));
/// assert_eq!(tokenizer.decode(&tokens), "hel");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteTokenizer;

impl ByteTokenizer {
    /// End-of-output marker
    pub const STOP: Token = 256;
}

impl Tokenizer for ByteTokenizer {
    fn encode(&self, text: &str, max_len: Option<usize>) -> Vec<Token> {
        let limit = max_len.unwrap_or(usize::MAX);
        text.bytes().take(limit).map(Token::from).collect()
    }

    fn decode(&self, tokens: &[Token]) -> String {
        let bytes: Vec<u8> = tokens
            .iter()
            .filter_map(|&t| u8::try_from(t).ok())
            .collect();
        // Truncation can split a multi-byte character; drop the partial bytes
        bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
    }

    fn stop_token(&self) -> Token {
        Self::STOP
    }
}
