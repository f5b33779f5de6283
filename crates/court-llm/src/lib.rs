//! # Court LLM
//!
//! The text-generation collaborator behind argument writing and LLM-backed
//! judging.
//!
//! ## Providers
//!
//! - **Mock**: canned, smart, failing and slow modes for tests
//! - **Ollama**: local inference
//! - **OpenAI**: any OpenAI-compatible chat completions endpoint
//!
//! HTTP providers are wrapped in [`ResilientProvider`], which adds a per-request
//! timeout and a circuit breaker.
//!
//! ## Quick Start
//!
//! ```rust
//! use court_llm::{LlmProvider, MockProvider};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = MockProvider::constant("The record speaks for itself.");
//! let reply = provider.ask("Opening statement?").await.unwrap();
//! assert_eq!(reply, "The record speaks for itself.");
//! # }
//! ```

pub mod config;
mod http;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod provider;
pub mod resilient_provider;

pub use config::{ConfigError, LlmConfig, ProviderKind};
pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;
pub use provider::{complete_within, LlmError, LlmProvider, LlmRequest, LlmResponse};
pub use resilient_provider::{CircuitState, LlmCircuitConfig, ResilientProvider};
