//! OpenAI Provider Implementation
//!
//! Provides integration with OpenAI-compatible chat completion APIs.
//!
//! # Features
//!
//! - Async HTTP communication with the chat completions endpoint
//! - Configurable base URL, model and API key (or read from the environment)
//! - Retry logic with exponential backoff on transport errors, 429 and 5xx
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use estimator_llm::OpenAiProvider;
//!
//! let provider = OpenAiProvider::new("sk-...", "gpt-4o").unwrap();
//!
//! // The complete method is async; the LlmProvider trait offers a blocking
//! // wrapper for use from worker threads.
//! ```

use crate::LlmError;
use estimator_domain::{GenerationRequest, LlmProvider};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default timeout for LLM requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// OpenAI chat completions provider
pub struct OpenAiProvider {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a new provider against the default base URL
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Configuration` if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a provider from `OPENAI_API_KEY`, `OPENAI_MODEL` and `OPENAI_BASE_URL`
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| LlmError::Configuration("OPENAI_API_KEY is not set".to_string()))?;
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let provider = Self::new(api_key, model)?;
        Ok(match std::env::var("OPENAI_BASE_URL") {
            Ok(base_url) => provider.with_base_url(base_url),
            Err(_) => provider,
        })
    }

    /// Point the provider at another OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Model name sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run a chat completion
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The endpoint cannot be reached after all retries
    /// - The model is not available (HTTP 404)
    /// - The response cannot be decoded
    /// - The response carries no message content
    pub async fn complete(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: &request.system },
                ChatMessage { role: "user", content: &request.prompt },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response
                            .json::<ChatCompletionResponse>()
                            .await
                            .map_err(|e| LlmError::InvalidResponse(
                                format!("Failed to parse response: {}", e)
                            ))?;
                        return parsed
                            .choices
                            .into_iter()
                            .next()
                            .and_then(|choice| choice.message.content)
                            .filter(|content| !content.trim().is_empty())
                            .ok_or(LlmError::EmptyResponse);
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else if status.is_server_error() {
                        let error_text = response.text().await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(
                            format!("HTTP {}: {}", status, error_text)
                        ));
                    } else {
                        let error_text = response.text().await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        return Err(LlmError::Communication(
                            format!("HTTP {}: {}", status, error_text)
                        ));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(
                        format!("Request failed: {}", e)
                    ));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Chat completion attempt {} failed, retrying in {:?}", attempts, delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            LlmError::Communication("Max retries exceeded".to_string())
        }))
    }
}

impl LlmProvider for OpenAiProvider {
    type Error = LlmError;

    /// Blocking wrapper around [`OpenAiProvider::complete`]
    ///
    /// Must be called from a thread that is not driving async tasks, such as a
    /// `spawn_blocking` worker.
    fn generate(&self, request: &GenerationRequest) -> Result<String, Self::Error> {
        debug!(model = %self.model, max_tokens = request.max_tokens, "Sending chat completion");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle.block_on(self.complete(request)),
            Err(_) => tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?
                .block_on(self.complete(request)),
        }
    }
}
