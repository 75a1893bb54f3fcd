//! Cooperative pacing between consecutive upstream calls.
//!
//! Every adapter waits a fixed delay after each external call. There is no
//! retry: a failed call is reported once and the run moves on.

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    /// Sleep for the configured delay. A zero delay returns immediately.
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
