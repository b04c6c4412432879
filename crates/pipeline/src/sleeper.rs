//! Injectable delays.
//!
//! The reference flows sprinkle fixed waits around (the analysis delay,
//! the tour close delay). [`Sleeper`] lifts those behind a trait so the
//! services stay testable without real timers.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Test sleeper that returns immediately and records what was asked of it.
#[derive(Debug, Default)]
pub struct NoopSleeper {
    requested: Mutex<Vec<Duration>>,
}

impl NoopSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations requested so far, in call order.
    pub fn requests(&self) -> Vec<Duration> {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Sleeper for NoopSleeper {
    async fn sleep(&self, duration: Duration) {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }
}
