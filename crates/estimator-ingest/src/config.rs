//! Configuration for the ingestion pipeline

use crate::error::IngestError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Tokenizer used for budgeting chunks and document parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerKind {
    /// BPE encoding used by GPT-4 class models
    #[default]
    Cl100kBase,
    /// BPE encoding used by GPT-4o class models
    O200kBase,
    /// One token per whitespace-separated word
    Whitespace,
}

/// Configuration for the document processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Token budget of a single chunk
    pub max_tokens_per_chunk: usize,

    /// Token ceiling above which a document is split into parts
    pub max_tokens_per_document_part: usize,

    /// Fields below this confidence are marked invalid
    pub min_confidence_threshold: f64,

    /// Absolute context limit of the extraction model
    pub max_context_tokens: usize,

    /// Response tokens that must remain available after the prompt
    pub min_response_tokens: usize,

    /// Upper bound on response tokens requested from the model
    pub max_response_tokens: u32,

    /// Sampling temperature for extraction calls
    pub temperature: f32,

    /// Maximum time for a single field extraction call (seconds)
    pub extraction_timeout_secs: u64,

    /// Tokenizer used for all token counting
    pub tokenizer: TokenizerKind,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_tokens_per_chunk: 8000,
            // Safely below the 128,000 model limit
            max_tokens_per_document_part: 120_000,
            min_confidence_threshold: 0.7,
            max_context_tokens: 128_000,
            min_response_tokens: 1000,
            max_response_tokens: 4000,
            temperature: 0.3,
            extraction_timeout_secs: 120,
            tokenizer: TokenizerKind::Cl100kBase,
        }
    }
}

impl IngestConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), IngestError> {
        let fail = |msg: &str| Err(IngestError::Config(msg.to_string()));

        if self.max_tokens_per_chunk == 0 {
            return fail("max_tokens_per_chunk must be greater than 0");
        }
        if self.max_tokens_per_document_part == 0 {
            return fail("max_tokens_per_document_part must be greater than 0");
        }
        if self.max_tokens_per_chunk > self.max_tokens_per_document_part {
            return fail("max_tokens_per_chunk cannot exceed max_tokens_per_document_part");
        }
        if self.min_response_tokens >= self.max_context_tokens {
            return fail("min_response_tokens must be below max_context_tokens");
        }
        if !(0.0..=1.0).contains(&self.min_confidence_threshold) {
            return fail("min_confidence_threshold must be within [0.0, 1.0]");
        }
        if self.extraction_timeout_secs == 0 {
            return fail("extraction_timeout_secs must be greater than 0");
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, IngestError> {
        toml::from_str(toml_str)
            .map_err(|e| IngestError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, IngestError> {
        toml::to_string_pretty(self)
            .map_err(|e| IngestError::Config(format!("Failed to serialize to TOML: {}", e)))
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Recognized keys: `MAX_TOKENS_PER_CHUNK`, `MAX_TOKENS_PER_DOCUMENT_PART`,
    /// `MIN_CONFIDENCE_THRESHOLD`, `MAX_CONTEXT_TOKENS`, `OPENAI_MAX_TOKENS`,
    /// `OPENAI_TEMPERATURE`. Unparseable values are ignored.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        override_from(&lookup, "MAX_TOKENS_PER_CHUNK", &mut self.max_tokens_per_chunk);
        override_from(&lookup, "MAX_TOKENS_PER_DOCUMENT_PART", &mut self.max_tokens_per_document_part);
        override_from(&lookup, "MIN_CONFIDENCE_THRESHOLD", &mut self.min_confidence_threshold);
        override_from(&lookup, "MAX_CONTEXT_TOKENS", &mut self.max_context_tokens);
        override_from(&lookup, "OPENAI_MAX_TOKENS", &mut self.max_response_tokens);
        override_from(&lookup, "OPENAI_TEMPERATURE", &mut self.temperature);
        self
    }
}

fn override_from<F, T>(lookup: &F, key: &str, slot: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *slot = value,
            Err(_) => warn!("Ignoring {}={:?}: not a valid value", key, raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = IngestConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_tokens_per_chunk, 8000);
        assert_eq!(config.max_tokens_per_document_part, 120_000);
        assert_eq!(config.min_confidence_threshold, 0.7);
    }

    #[test]
    fn test_invalid_chunk_budget() {
        let mut config = IngestConfig::default();
        config.max_tokens_per_chunk = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_chunk_larger_than_part() {
        let mut config = IngestConfig::default();
        config.max_tokens_per_chunk = config.max_tokens_per_document_part + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_threshold() {
        let mut config = IngestConfig::default();
        config.min_confidence_threshold = 1.5;
        assert!(matches!(config.validate(), Err(IngestError::Config(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = IngestConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = IngestConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = IngestConfig::from_toml("max_tokens_per_chunk = 500\ntokenizer = \"whitespace\"").unwrap();
        assert_eq!(parsed.max_tokens_per_chunk, 500);
        assert_eq!(parsed.tokenizer, TokenizerKind::Whitespace);
        assert_eq!(parsed.max_tokens_per_document_part, 120_000);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("MAX_TOKENS_PER_CHUNK", "2000"),
            ("MIN_CONFIDENCE_THRESHOLD", "0.5"),
            ("OPENAI_MAX_TOKENS", "not a number"),
        ]
        .into_iter()
        .collect();

        let config = IngestConfig::default()
            .with_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.max_tokens_per_chunk, 2000);
        assert_eq!(config.min_confidence_threshold, 0.5);
        assert_eq!(config.max_response_tokens, 4000);
    }
}
