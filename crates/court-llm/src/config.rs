//! Provider configuration
//!
//! Environment variables:
//! - `COURT_LLM_PROVIDER`: `mock` (default), `ollama` or `openai`
//! - `COURT_LLM_MODEL`: model name, default depends on provider
//! - `COURT_LLM_BASE_URL`: endpoint override for OpenAI-compatible servers
//! - `OPENAI_API_KEY`: required for `openai`
//! - `OLLAMA_URL`: Ollama endpoint (default: http://localhost:11434)
//! - `COURT_LLM_TIMEOUT_SECS`: per-request timeout (default: 60)

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::ollama::{OllamaProvider, DEFAULT_OLLAMA_URL};
use crate::openai::{OpenAIProvider, DEFAULT_OPENAI_URL};
use crate::resilient_provider::{LlmCircuitConfig, ResilientProvider};
use crate::{LlmProvider, MockProvider};

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which backend produces text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Mock,
    Ollama,
    OpenAi,
}

impl ProviderKind {
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Mock => "smart-mock",
            ProviderKind::Ollama => "llama3",
            ProviderKind::OpenAi => "gpt-4o-mini",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(ProviderKind::Mock),
            "ollama" => Ok(ProviderKind::Ollama),
            "openai" => Ok(ProviderKind::OpenAi),
            other => Err(ConfigError::Invalid(format!(
                "unknown provider '{}' (expected mock, ollama or openai)",
                other
            ))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProviderKind::Mock => "mock",
            ProviderKind::Ollama => "ollama",
            ProviderKind::OpenAi => "openai",
        };
        f.write_str(s)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    /// Model name; `None` uses the provider default
    pub model: Option<String>,
    /// OpenAI-compatible endpoint override
    pub base_url: Option<String>,
    pub openai_api_key: Option<String>,
    pub ollama_url: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Mock,
            model: None,
            base_url: None,
            openai_api_key: None,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from any key/value source (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let provider = match lookup("COURT_LLM_PROVIDER") {
            Some(raw) => raw.parse()?,
            None => defaults.provider,
        };
        let timeout_secs = match lookup("COURT_LLM_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("COURT_LLM_TIMEOUT_SECS '{}' is not a number", raw))
            })?,
            None => defaults.timeout_secs,
        };

        let config = Self {
            provider,
            model: lookup("COURT_LLM_MODEL").filter(|m| !m.trim().is_empty()),
            base_url: lookup("COURT_LLM_BASE_URL").filter(|u| !u.trim().is_empty()),
            openai_api_key: lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            ollama_url: lookup("OLLAMA_URL").unwrap_or(defaults.ollama_url),
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "COURT_LLM_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }
        if self.provider == ProviderKind::OpenAi && self.openai_api_key.is_none() {
            return Err(ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn model_name(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Build the configured provider. HTTP backends are wrapped in a circuit breaker.
    pub fn build_provider(&self) -> Result<Arc<dyn LlmProvider>, ConfigError> {
        self.validate()?;
        let timeout = self.timeout();

        let backend: Arc<dyn LlmProvider> = match self.provider {
            ProviderKind::Mock => return Ok(Arc::new(MockProvider::smart())),
            ProviderKind::Ollama => Arc::new(OllamaProvider::with_url(
                self.base_url.as_deref().unwrap_or(&self.ollama_url),
                self.model_name(),
                timeout,
            )),
            ProviderKind::OpenAi => {
                let key = self
                    .openai_api_key
                    .as_deref()
                    .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))?;
                Arc::new(OpenAIProvider::with_base_url(
                    self.base_url.as_deref().unwrap_or(DEFAULT_OPENAI_URL),
                    key,
                    self.model_name(),
                    timeout,
                ))
            }
        };

        tracing::info!(provider = %self.provider, model = %self.model_name(), "LLM provider configured");
        Ok(Arc::new(ResilientProvider::new(
            backend,
            LlmCircuitConfig {
                request_timeout: timeout,
                ..LlmCircuitConfig::default()
            },
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = LlmConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.provider, ProviderKind::Mock);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.model_name(), "smart-mock");
    }

    #[test]
    fn test_openai_requires_key() {
        let err = LlmConfig::from_lookup(lookup(&[("COURT_LLM_PROVIDER", "openai")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "OPENAI_API_KEY"));

        let config = LlmConfig::from_lookup(lookup(&[
            ("COURT_LLM_PROVIDER", "OpenAI"),
            ("OPENAI_API_KEY", "sk-test"),
            ("COURT_LLM_MODEL", "moonshot-v1-8k"),
        ]))
        .unwrap();
        assert_eq!(config.model_name(), "moonshot-v1-8k");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            LlmConfig::from_lookup(lookup(&[("COURT_LLM_PROVIDER", "carrier-pigeon")])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            LlmConfig::from_lookup(lookup(&[("COURT_LLM_TIMEOUT_SECS", "0")])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            LlmConfig::from_lookup(lookup(&[("COURT_LLM_TIMEOUT_SECS", "soon")])),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_build_mock_provider() {
        let provider = LlmConfig::default().build_provider().unwrap();
        assert!(provider.is_available().await);
        assert_eq!(provider.name(), "smart-mock");
    }
}
