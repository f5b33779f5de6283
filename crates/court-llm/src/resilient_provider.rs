//! Circuit breaker and per-attempt timeout around any provider
//!
//! Closed: requests pass through. Open: requests fail fast with
//! [`LlmError::NotAvailable`]. Half-open: after `reset_timeout`, requests are let
//! through again and `success_threshold` successes close the circuit.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::provider::complete_within;
use crate::{LlmError, LlmProvider, LlmRequest, LlmResponse};

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

/// Configuration for the LLM circuit breaker
#[derive(Debug, Clone)]
pub struct LlmCircuitConfig {
    /// Consecutive availability failures before opening
    pub failure_threshold: u32,
    /// Successes in half-open needed to close
    pub success_threshold: u32,
    /// Cool-down before a recovery attempt
    pub reset_timeout: Duration,
    /// Upper bound on a single completion
    pub request_timeout: Duration,
}

impl Default for LlmCircuitConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            success_threshold: 2,
            reset_timeout: Duration::from_secs(60),
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    opened_at: Option<Instant>,
}

/// Provider wrapper that stops calling a backend after repeated outages
#[derive(Debug)]
pub struct ResilientProvider {
    inner: Arc<dyn LlmProvider>,
    config: LlmCircuitConfig,
    breaker: RwLock<BreakerState>,
}

impl ResilientProvider {
    pub fn new(inner: Arc<dyn LlmProvider>, config: LlmCircuitConfig) -> Self {
        Self {
            inner,
            config,
            breaker: RwLock::new(BreakerState {
                state: CircuitState::Closed,
                failure_count: 0,
                success_count: 0,
                opened_at: None,
            }),
        }
    }

    pub fn wrap(inner: Arc<dyn LlmProvider>) -> Self {
        Self::new(inner, LlmCircuitConfig::default())
    }

    pub async fn circuit_state(&self) -> CircuitState {
        self.breaker.read().await.state
    }

    async fn check_circuit(&self) -> Result<(), LlmError> {
        let mut breaker = self.breaker.write().await;
        if breaker.state != CircuitState::Open {
            return Ok(());
        }
        match breaker.opened_at {
            Some(opened) if opened.elapsed() >= self.config.reset_timeout => {
                breaker.state = CircuitState::HalfOpen;
                breaker.success_count = 0;
                tracing::info!(provider = %self.inner.name(), "Circuit half-open - testing recovery");
                Ok(())
            }
            _ => Err(LlmError::NotAvailable),
        }
    }

    async fn record_success(&self) {
        let mut breaker = self.breaker.write().await;
        breaker.failure_count = 0;
        if breaker.state == CircuitState::HalfOpen {
            breaker.success_count += 1;
            if breaker.success_count >= self.config.success_threshold {
                breaker.state = CircuitState::Closed;
                breaker.success_count = 0;
                tracing::info!(provider = %self.inner.name(), "Circuit closed - provider recovered");
            }
        }
    }

    async fn record_failure(&self) {
        metrics::counter!("court_llm_failures_total", "provider" => self.inner.name().to_string())
            .increment(1);
        let mut breaker = self.breaker.write().await;
        breaker.failure_count += 1;

        let trip = breaker.state == CircuitState::HalfOpen
            || breaker.failure_count >= self.config.failure_threshold;
        if trip && breaker.state != CircuitState::Open {
            breaker.state = CircuitState::Open;
            breaker.opened_at = Some(Instant::now());
            metrics::counter!("court_llm_circuit_opens_total").increment(1);
            tracing::warn!(
                provider = %self.inner.name(),
                failures = breaker.failure_count,
                "Circuit opened"
            );
        }
    }
}

#[async_trait]
impl LlmProvider for ResilientProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn is_available(&self) -> bool {
        self.check_circuit().await.is_ok() && self.inner.is_available().await
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        self.check_circuit().await?;

        match complete_within(self.inner.as_ref(), request, self.config.request_timeout).await {
            Ok(response) => {
                self.record_success().await;
                Ok(response)
            }
            Err(e) => {
                // Malformed replies say nothing about backend health
                if e.is_availability_failure() {
                    self.record_failure().await;
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockProvider;

    fn quick_config() -> LlmCircuitConfig {
        LlmCircuitConfig {
            failure_threshold: 2,
            success_threshold: 1,
            reset_timeout: Duration::from_millis(30),
            request_timeout: Duration::from_millis(200),
        }
    }

    #[tokio::test]
    async fn test_resilient_provider_passes_through() {
        let resilient = ResilientProvider::wrap(Arc::new(MockProvider::constant("ok")));
        assert_eq!(resilient.ask("test").await.unwrap(), "ok");
        assert_eq!(resilient.circuit_state().await, CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_opens_after_repeated_failures() {
        let mock = Arc::new(MockProvider::failing());
        let resilient = ResilientProvider::new(mock.clone(), quick_config());

        assert!(resilient.ask("a").await.is_err());
        assert!(resilient.ask("b").await.is_err());
        assert_eq!(resilient.circuit_state().await, CircuitState::Open);

        // Fails fast without reaching the backend
        assert!(matches!(resilient.ask("c").await, Err(LlmError::NotAvailable)));
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let mock = Arc::new(MockProvider::slow(Duration::from_secs(5)));
        let resilient = ResilientProvider::new(mock, quick_config());
        assert!(matches!(resilient.ask("a").await, Err(LlmError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_half_open_recovers() {
        let resilient = ResilientProvider::new(Arc::new(MockProvider::constant("back")), quick_config());
        {
            let mut breaker = resilient.breaker.write().await;
            breaker.state = CircuitState::Open;
            breaker.opened_at = Some(Instant::now() - Duration::from_millis(50));
        }
        assert_eq!(resilient.ask("probe").await.unwrap(), "back");
        assert_eq!(resilient.circuit_state().await, CircuitState::Closed);
    }
}
