//! Token counting for chunk and document budgets

use crate::config::TokenizerKind;
use crate::error::IngestError;
use std::sync::Arc;
use tiktoken_rs::CoreBPE;
use tracing::warn;

/// Counts and splits text into model tokens
pub trait Tokenizer: Send + Sync {
    /// Number of tokens in `text`
    fn count(&self, text: &str) -> usize;

    /// Text of every token in `text`, in order
    fn split(&self, text: &str) -> Vec<String>;
}

/// BPE tokenizer compatible with OpenAI chat models
pub struct BpeTokenizer {
    bpe: CoreBPE,
}

impl BpeTokenizer {
    /// `cl100k_base` encoding
    pub fn cl100k() -> Result<Self, IngestError> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| IngestError::Config(format!("Failed to load cl100k_base: {}", e)))?;
        Ok(Self { bpe })
    }

    /// `o200k_base` encoding
    pub fn o200k() -> Result<Self, IngestError> {
        let bpe = tiktoken_rs::o200k_base()
            .map_err(|e| IngestError::Config(format!("Failed to load o200k_base: {}", e)))?;
        Ok(Self { bpe })
    }
}

impl Tokenizer for BpeTokenizer {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    fn split(&self, text: &str) -> Vec<String> {
        // tiktoken decodes each token with from_utf8_lossy, so this does not fail in practice
        match self.bpe.split_by_token_ordinary(text) {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!("Token split failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// One token per whitespace-separated word
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }

    fn split(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}

/// Build the tokenizer selected in configuration
pub fn build_tokenizer(kind: TokenizerKind) -> Result<Arc<dyn Tokenizer>, IngestError> {
    Ok(match kind {
        TokenizerKind::Cl100kBase => Arc::new(BpeTokenizer::cl100k()?),
        TokenizerKind::O200kBase => Arc::new(BpeTokenizer::o200k()?),
        TokenizerKind::Whitespace => Arc::new(WhitespaceTokenizer),
    })
}
