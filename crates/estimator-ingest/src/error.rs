//! Error types for the ingestion pipeline

use estimator_llm::LlmError;
use thiserror::Error;

/// Errors that can occur while turning a document into a validated record
#[derive(Error, Debug)]
pub enum IngestError {
    /// Source file type outside pdf/docx/txt
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Reading a source file or calling the field extractor failed
    #[error("Extraction failed: {0}")]
    ExtractionFailure(String),

    /// Prompt framing plus chunk text would not fit the model context
    #[error("Chunk too large: {tokens} tokens (max: {limit})")]
    ChunkTooLarge {
        /// Tokens required including the reserved response allowance
        tokens: usize,
        /// Absolute model context limit
        limit: usize,
    },

    /// Extractor response is not the expected structured shape
    #[error("Malformed extraction response: {0}")]
    MalformedExtractionResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A blocking worker panicked or was cancelled
    #[error("Worker error: {0}")]
    Join(String),
}

impl IngestError {
    /// Only malformed responses are downgraded to empty data; everything else is fatal
    pub fn is_recoverable(&self) -> bool {
        matches!(self, IngestError::MalformedExtractionResponse(_))
    }
}

impl From<LlmError> for IngestError {
    fn from(e: LlmError) -> Self {
        IngestError::ExtractionFailure(e.to_string())
    }
}

impl From<tokio::task::JoinError> for IngestError {
    fn from(e: tokio::task::JoinError) -> Self {
        IngestError::Join(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_malformed_is_recoverable() {
        assert!(IngestError::MalformedExtractionResponse("x".into()).is_recoverable());
        assert!(!IngestError::ExtractionFailure("x".into()).is_recoverable());
        assert!(!IngestError::ChunkTooLarge { tokens: 2, limit: 1 }.is_recoverable());
        assert!(!IngestError::UnsupportedFileType("xls".into()).is_recoverable());
    }

    #[test]
    fn test_llm_error_becomes_extraction_failure() {
        let err: IngestError = LlmError::EmptyResponse.into();
        assert!(matches!(err, IngestError::ExtractionFailure(ref m) if m.contains("No content")));
    }

    #[test]
    fn test_chunk_too_large_message() {
        let err = IngestError::ChunkTooLarge { tokens: 130_000, limit: 128_000 };
        assert_eq!(err.to_string(), "Chunk too large: 130000 tokens (max: 128000)");
    }
}
