//! OpenAI-compatible chat completions provider
//!
//! Works against any endpoint speaking `/v1/chat/completions` (OpenAI, DeepSeek,
//! Moonshot, vLLM, LM Studio) by changing the base URL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::http;
use crate::provider::{LlmError, LlmProvider, LlmRequest, LlmResponse};

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: String,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

/// OpenAI-compatible provider
#[derive(Debug)]
pub struct OpenAIProvider {
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAIProvider {
    /// Provider against api.openai.com
    pub fn new(api_key: &str, model: &str) -> Self {
        Self::with_base_url(DEFAULT_OPENAI_URL, api_key, model, Duration::from_secs(60))
    }

    pub fn with_base_url(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client: http::client(timeout),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/v1/models", self.base_url);
        matches!(
            self.client.get(&url).bearer_auth(&self.api_key).send().await,
            Ok(r) if r.status().is_success()
        )
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = Instant::now();
        let url = format!("{}/v1/chat/completions", self.base_url);

        let body = ChatRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: request.system,
                },
                Message {
                    role: "user",
                    content: request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let request_builder = self.client.post(&url).bearer_auth(&self.api_key);
        let api_response: ChatResponse = http::send_json(request_builder, &body, self.timeout).await?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

        Ok(LlmResponse {
            content,
            model: api_response.model,
            tokens_used: api_response.usage.map(|u| u.total_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_system_then_user() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: [
                Message {
                    role: "system",
                    content: "You are an advocate.".into(),
                },
                Message {
                    role: "user",
                    content: "Round 1".into(),
                },
            ],
            temperature: 0.7,
            max_tokens: 400,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Round 1");
    }

    #[test]
    fn test_response_without_content_is_invalid() {
        let raw = r#"{"choices":[{"message":{}}],"model":"m","usage":null}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
