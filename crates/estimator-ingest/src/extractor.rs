//! LLM-backed field extractor

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::parser::parse_extraction_response;
use crate::prompt::{PromptBuilder, SYSTEM_MESSAGE};
use crate::tokenizer::Tokenizer;
use estimator_domain::{FieldExtractor, FieldSet, GenerationRequest, LlmProvider};
use std::sync::Arc;
use tracing::{debug, error};

/// Extracts fields from a chunk with a single completion call
pub struct LlmFieldExtractor<L> {
    provider: L,
    tokenizer: Arc<dyn Tokenizer>,
    max_context_tokens: usize,
    min_response_tokens: usize,
    max_response_tokens: u32,
    temperature: f32,
}

impl<L: LlmProvider> LlmFieldExtractor<L> {
    /// Create an extractor taking its context budget from `config`
    pub fn new(provider: L, tokenizer: Arc<dyn Tokenizer>, config: &IngestConfig) -> Self {
        Self {
            provider,
            tokenizer,
            max_context_tokens: config.max_context_tokens,
            min_response_tokens: config.min_response_tokens,
            max_response_tokens: config.max_response_tokens,
            temperature: config.temperature,
        }
    }

    /// The wrapped provider
    pub fn provider(&self) -> &L {
        &self.provider
    }

    /// Build the request for one chunk, enforcing the context budget
    fn build_request(&self, chunk_text: &str, context_hint: &[String]) -> Result<GenerationRequest, IngestError> {
        let prompt = PromptBuilder::new(chunk_text, context_hint).build();

        let input_tokens = self.tokenizer.count(SYSTEM_MESSAGE) + self.tokenizer.count(&prompt);
        let required = input_tokens + self.min_response_tokens;
        if required > self.max_context_tokens {
            error!(
                "Chunk too large: {} input tokens leave less than {} for the response",
                input_tokens, self.min_response_tokens
            );
            return Err(IngestError::ChunkTooLarge {
                tokens: required,
                limit: self.max_context_tokens,
            });
        }

        let available = self.max_context_tokens - input_tokens;
        let max_tokens = available.min(self.max_response_tokens as usize) as u32;
        debug!(
            "Extracting chunk with {} input tokens, response budget {}",
            input_tokens, max_tokens
        );

        Ok(GenerationRequest::new(SYSTEM_MESSAGE, prompt, max_tokens).with_temperature(self.temperature))
    }
}

impl<L> FieldExtractor for LlmFieldExtractor<L>
where
    L: LlmProvider,
    L::Error: Into<IngestError>,
{
    type Error = IngestError;

    fn extract(&self, chunk_text: &str, context_hint: &[String]) -> Result<FieldSet, Self::Error> {
        let request = self.build_request(chunk_text, context_hint)?;

        let response = self
            .provider
            .generate(&request)
            .map_err(Into::<IngestError>::into)?;
        if response.trim().is_empty() {
            return Err(IngestError::ExtractionFailure("No content in response".to_string()));
        }

        debug!("LLM response length: {} chars", response.len());
        parse_extraction_response(&response)
    }
}
