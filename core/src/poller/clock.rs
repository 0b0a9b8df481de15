//! Injectable time source for the polling loop.

use std::time::Duration;

use async_trait::async_trait;

/// Source of delays between polls.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Completes after `duration` has elapsed.
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock delays backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
