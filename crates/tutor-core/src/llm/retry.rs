//! Gateway-level retry for transient failures.
//!
//! The tutor orchestrator never retries. Deployments that want retries wrap
//! their gateway in [`RetryingGateway`], which re-sends the same request on
//! `Timeout`, `RateLimited` and `UpstreamError` with exponential backoff.
//! `AuthError` and `MalformedResponse` are returned immediately.

use std::time::Duration;

use tracing::warn;

use tutor_types::llm::{GatewayError, ImageInput};

use super::gateway::LlmGateway;

/// Retry schedule for a [`RetryingGateway`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. `1` disables retry.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after every failure.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Maximum backoff between two attempts.
    const MAX_DELAY: Duration = Duration::from_secs(30);

    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Whether another attempt is allowed after `attempt` (1-based) failed.
    pub fn should_retry(&self, attempt: u32, error: &GatewayError) -> bool {
        attempt < self.max_attempts && error.is_transient()
    }

    /// Delay to wait after `attempt` (1-based) failed with `error`.
    ///
    /// A provider-supplied `retry_after` wins over the computed backoff.
    pub fn delay_for(&self, attempt: u32, error: &GatewayError) -> Duration {
        if let GatewayError::RateLimited {
            retry_after_ms: Some(ms),
        } = error
        {
            return Duration::from_millis(*ms).min(Self::MAX_DELAY);
        }
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(Self::MAX_DELAY)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1, Duration::from_millis(500))
    }
}

/// Wraps any [`LlmGateway`] with a [`RetryPolicy`].
pub struct RetryingGateway<G: LlmGateway> {
    inner: G,
    policy: RetryPolicy,
}

impl<G: LlmGateway> RetryingGateway<G> {
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<G: LlmGateway> LlmGateway for RetryingGateway<G> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let mut attempt = 1;
        loop {
            match self.inner.generate(prompt).await {
                Ok(text) => return Ok(text),
                Err(err) if self.policy.should_retry(attempt, &err) => {
                    let delay = self.policy.delay_for(attempt, &err);
                    warn!(
                        gateway = self.inner.name(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient gateway failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn analyze_image(
        &self,
        image: &ImageInput,
        instructions: &str,
    ) -> Result<String, GatewayError> {
        let mut attempt = 1;
        loop {
            match self.inner.analyze_image(image, instructions).await {
                Ok(text) => return Ok(text),
                Err(err) if self.policy.should_retry(attempt, &err) => {
                    let delay = self.policy.delay_for(attempt, &err);
                    warn!(
                        gateway = self.inner.name(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient gateway failure during image analysis, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
