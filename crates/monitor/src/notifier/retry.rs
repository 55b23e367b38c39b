use async_trait::async_trait;

use super::channel::{Notifier, NotifyError};

// max_retries = 0 is a single attempt
pub struct RetryNotifier<N: Notifier> {
    inner: N,
    max_retries: u32,
    base_delay_ms: u64,
}

impl<N: Notifier> RetryNotifier<N> {
    pub fn new(inner: N, max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            inner,
            max_retries,
            base_delay_ms,
        }
    }
}

#[async_trait]
impl<N: Notifier> Notifier for RetryNotifier<N> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn send(&self, subject: &str, body: &str, to: &str) -> Result<(), NotifyError> {
        let mut attempt = 0u32;
        loop {
            match self.inner.send(subject, body, to).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt >= self.max_retries => return Err(e),
                Err(e) => {
                    let delay = self
                        .base_delay_ms
                        .saturating_mul(2u64.saturating_pow(attempt));
                    tracing::debug!(channel = self.inner.name(), attempt, delay_ms = delay, error = %e, "notification failed, retrying");
                    tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
                    attempt += 1;
                }
            }
        }
    }
}
