// ABOUTME: Injectable sleep abstraction for release waits.
// ABOUTME: Lets tests run the state machine without real delays.

use async_trait::async_trait;
use std::time::Duration;

/// Blocks the release flow for a fixed duration.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real delays backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
