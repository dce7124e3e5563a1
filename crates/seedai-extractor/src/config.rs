//! Configuration for the seed pipeline

use crate::prompt::PromptTemplate;
use serde::{Deserialize, Serialize};

/// Tokens a chat API spends on role framing for one system and one user message
pub const CHAT_ROLE_OVERHEAD_TOKENS: usize = 11;

/// Configuration for the seed pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Model context window in tokens
    pub context_length: usize,

    /// Fraction of the window left for the completion
    pub generation_reserve: f64,

    /// Tokens the backend adds around the prompt
    pub role_overhead_tokens: usize,

    /// Stop after this many new seeds have been written
    pub seed_target: usize,

    /// Prompt scaffolding and extraction strategy
    pub template: PromptTemplate,
}

impl ExtractorConfig {
    /// Largest prompt, in tokens, that leaves room for generation
    pub fn max_encode_length(&self) -> usize {
        let usable = (self.context_length as f64 * (1.0 - self.generation_reserve)).floor() as usize;
        usable.saturating_sub(self.role_overhead_tokens)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.context_length == 0 {
            return Err("context_length must be greater than 0".to_string());
        }
        if !(0.0..1.0).contains(&self.generation_reserve) {
            return Err("generation_reserve must be in [0, 1)".to_string());
        }
        if self.seed_target == 0 {
            return Err("seed_target must be greater than 0".to_string());
        }
        if self.max_encode_length() == 0 {
            return Err(format!(
                "no room for a prompt: context_length {} leaves 0 tokens after reserve and overhead",
                self.context_length
            ));
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Causal model with a fine-tuned prompt format
    fn default() -> Self {
        Self {
            context_length: 2048,
            generation_reserve: 0.25,
            role_overhead_tokens: 0,
            seed_target: 100,
            template: PromptTemplate::default(),
        }
    }
}

impl ExtractorConfig {
    /// Causal model: a quarter of the window is kept for generation
    pub fn causal() -> Self {
        Self::default()
    }

    /// Sequence-to-sequence model: the output has its own window, no split token
    pub fn seq2seq() -> Self {
        Self {
            generation_reserve: 0.0,
            template: PromptTemplate::fine_tune(""),
            ..Self::default()
        }
    }

    /// Chat completion API asked for a list of literals
    pub fn chat() -> Self {
        Self {
            role_overhead_tokens: CHAT_ROLE_OVERHEAD_TOKENS,
            template: PromptTemplate::list_literal(),
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
