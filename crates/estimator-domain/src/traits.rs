//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the ingestion pipeline and its
//! collaborators. Implementations live in other crates.

use crate::FieldSet;
use std::path::Path;

/// Converts a source file into a single text blob
///
/// Implemented by the infrastructure layer (estimator-ingest `FileTextExtractor`)
pub trait TextExtractor {
    /// Error type for extraction operations
    type Error;

    /// Extract the plain text of `path`, interpreted as `mime_type`
    fn extract(&self, path: &Path, mime_type: &str) -> Result<String, Self::Error>;
}

/// Turns a chunk of text into named, confidence-scored fields
///
/// Implemented by the application layer (estimator-ingest `LlmFieldExtractor`)
pub trait FieldExtractor {
    /// Error type for extraction operations
    type Error;

    /// Extract fields from `chunk_text`; `context_hint` lists the contributing section ids
    fn extract(&self, chunk_text: &str, context_hint: &[String]) -> Result<FieldSet, Self::Error>;
}

/// A single completion request sent to an LLM
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// System message framing the task
    pub system: String,

    /// User prompt
    pub prompt: String,

    /// Upper bound on response tokens
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl GenerationRequest {
    /// Create a request with the given framing and response budget
    pub fn new(system: impl Into<String>, prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            max_tokens,
            temperature: 0.3,
        }
    }

    /// Override the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (estimator-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion for the request
    fn generate(&self, request: &GenerationRequest) -> Result<String, Self::Error>;
}
