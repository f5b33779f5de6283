//! LLM Provider trait and common types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors from LLM providers
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Provider not available")]
    NotAvailable,
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

impl LlmError {
    /// Failures that say the provider itself is unhealthy (as opposed to a bad reply)
    pub fn is_availability_failure(&self) -> bool {
        matches!(
            self,
            LlmError::ConnectionFailed(_)
                | LlmError::NotAvailable
                | LlmError::RateLimited
                | LlmError::Timeout(_)
        )
    }
}

/// A request to an LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    /// System prompt (persona)
    pub system: String,
    /// User message
    pub prompt: String,
    /// Temperature (0.0 = deterministic, 1.0 = creative)
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl LlmRequest {
    /// Create a simple request with default settings
    pub fn simple(prompt: &str) -> Self {
        Self::with_role("You are a helpful assistant.", prompt)
    }

    /// Create a request with a specific persona
    pub fn with_role(system: &str, prompt: &str) -> Self {
        Self {
            system: system.to_string(),
            prompt: prompt.to_string(),
            temperature: 0.7,
            max_tokens: 512,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Response from an LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated text
    pub content: String,
    /// Model used
    pub model: String,
    /// Tokens used (if available)
    pub tokens_used: Option<u32>,
    /// Time taken in milliseconds
    pub latency_ms: u64,
}

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync + std::fmt::Debug {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Check if the provider is available
    async fn is_available(&self) -> bool;

    /// Generate a completion
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Generate with a simple prompt (convenience method)
    async fn ask(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.complete(LlmRequest::simple(prompt)).await?;
        Ok(response.content)
    }
}

/// Run a completion, giving up after `timeout`
pub async fn complete_within(
    provider: &dyn LlmProvider,
    request: LlmRequest,
    timeout: Duration,
) -> Result<LlmResponse, LlmError> {
    match tokio::time::timeout(timeout, provider.complete(request)).await {
        Ok(result) => result,
        Err(_) => Err(LlmError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockProvider;

    #[tokio::test]
    async fn test_complete_within_passes_fast_replies() {
        let mock = MockProvider::constant("Order in the court.");
        let response = complete_within(&mock, LlmRequest::simple("hi"), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(response.content, "Order in the court.");
    }

    #[tokio::test]
    async fn test_complete_within_times_out() {
        let mock = MockProvider::constant("late").with_latency(Duration::from_millis(500));
        let err = complete_within(&mock, LlmRequest::simple("hi"), Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Timeout(_)));
        assert!(err.is_availability_failure());
    }
}
