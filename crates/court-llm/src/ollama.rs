//! Local models served by Ollama
//!
//! Uses the `/api/chat` endpoint so the judge and advocate personas travel as a
//! proper system message.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::http;
use crate::provider::{LlmError, LlmProvider, LlmRequest, LlmResponse};

/// Default local endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: [Turn<'a>; 2],
    stream: bool,
    options: Sampling,
}

#[derive(Debug, Serialize)]
struct Turn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct Sampling {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    model: String,
    message: ReplyMessage,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: String,
}

/// Chat completions against a local or LAN Ollama server
#[derive(Debug)]
pub struct OllamaProvider {
    base_url: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(model: &str) -> Self {
        Self::with_url(DEFAULT_OLLAMA_URL, model, Duration::from_secs(60))
    }

    pub fn with_url(base_url: &str, model: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout,
            client: http::client(timeout),
        }
    }

    fn body<'a>(&'a self, request: &'a LlmRequest) -> ChatBody<'a> {
        ChatBody {
            model: &self.model,
            messages: [
                Turn {
                    role: "system",
                    content: &request.system,
                },
                Turn {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            stream: false,
            options: Sampling {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        matches!(self.client.get(&url).send().await, Ok(r) if r.status().is_success())
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let started = Instant::now();
        let url = format!("{}/api/chat", self.base_url);

        let reply: ChatReply =
            http::send_json(self.client.post(&url), &self.body(&request), self.timeout).await?;
        if reply.message.content.trim().is_empty() {
            return Err(LlmError::InvalidResponse("empty message from ollama".to_string()));
        }

        let latency_ms = started.elapsed().as_millis() as u64;
        tracing::debug!(model = %reply.model, latency_ms, tokens = ?reply.eval_count, "ollama reply");

        Ok(LlmResponse {
            content: reply.message.content,
            model: reply.model,
            tokens_used: reply.eval_count,
            latency_ms,
        })
    }
}
