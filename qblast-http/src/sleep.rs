//! Pausing between status checks while waiting for a job.
//!

use std::time::Duration;

use async_trait::async_trait;

/// Suspends the wait loop between status checks.
#[async_trait]
pub trait Sleep {
  async fn sleep(&self, duration: Duration);
}

/// Sleeps using the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleep;

#[async_trait]
impl Sleep for TokioSleep {
  async fn sleep(&self, duration: Duration) {
    tokio::time::sleep(duration).await
  }
}
