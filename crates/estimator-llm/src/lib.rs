//! Estimator LLM Provider Layer
//!
//! Pluggable LLM provider implementations for the field extractor.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from `estimator-domain`.
//! It supports multiple LLM backends with a common interface.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI-compatible chat completions API
//!
//! # Examples
//!
//! ```
//! use estimator_llm::MockProvider;
//! use estimator_domain::{GenerationRequest, LlmProvider};
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let request = GenerationRequest::new("system", "test prompt", 100);
//! let result = provider.generate(&request).unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod openai;

use estimator_domain::{GenerationRequest, LlmProvider};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response body could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The model answered without any message content
    #[error("No content in response")]
    EmptyResponse,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider is missing credentials or has an unusable setting
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Scripted responses are matched by substring against the prompt, in the
/// order they were added, so a test can answer differently per chunk.
///
/// # Examples
///
/// ```
/// use estimator_llm::MockProvider;
/// use estimator_domain::{GenerationRequest, LlmProvider};
///
/// let mut provider = MockProvider::default();
/// provider.add_response("FIRE ALARM", r#"{"devices": [1]}"#);
///
/// let request = GenerationRequest::new("system", "...FIRE ALARM...", 100);
/// assert_eq!(provider.generate(&request).unwrap(), r#"{"devices": [1]}"#);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, MockReply)>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer prompts containing `needle` with `response`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).push((needle.into(), MockReply::Text(response.into())));
    }

    /// Fail prompts containing `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        lock(&self.responses).push((needle.into(), MockReply::Error));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Every request received so far, in call order
    pub fn requests(&self) -> Vec<GenerationRequest> {
        lock(&self.requests).clone()
    }

    /// Reset the recorded requests
    pub fn reset_call_count(&self) {
        lock(&self.requests).clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn generate(&self, request: &GenerationRequest) -> Result<String, Self::Error> {
        lock(&self.requests).push(request.clone());

        let responses = lock(&self.responses);
        let scripted = responses
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()));

        match scripted {
            Some((_, MockReply::Text(response))) => Ok(response.clone()),
            Some((_, MockReply::Error)) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }
}

// Poisoned locks are recovered: every critical section leaves the data consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest::new("system", prompt, 256)
    }

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate(&request("any prompt"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate(&request("say hello")).unwrap(), "world");
        assert_eq!(provider.generate(&request("foo fighters")).unwrap(), "bar");
        assert_eq!(provider.generate(&request("unknown")).unwrap(), "{}");
    }

    #[test]
    fn test_mock_provider_first_match_wins() {
        let mut provider = MockProvider::default();
        provider.add_response("section", "first");
        provider.add_response("section_1", "second");

        assert_eq!(provider.generate(&request("from section_1")).unwrap(), "first");
    }

    #[test]
    fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");

        assert_eq!(provider.call_count(), 0);

        provider.generate(&request("prompt1")).unwrap();
        assert_eq!(provider.call_count(), 1);

        provider.generate(&request("prompt2")).unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.requests()[1].prompt, "prompt2");

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.generate(&request("a bad prompt"));
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), LlmError::Other(_)));
    }

    #[test]
    fn test_mock_provider_clone() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate(&request("test")).unwrap();

        // Both should share the same call count due to Arc
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
