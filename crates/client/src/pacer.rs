//! Minimum spacing between outbound requests.
//!
//! The storefront throttles aggressive clients, so every request waits
//! until at least `min_interval` has passed since the previous one finished
//! waiting. The first request never waits.

use std::time::{Duration, Instant};

/// Single-slot request pacer.
///
/// [`Pacer::wait`] suspends the current task, [`Pacer::wait_blocking`]
/// blocks the current thread; both read and update the same timestamp.
/// Methods take `&mut self`, so one pacer has one caller at a time.
#[derive(Debug, Clone)]
pub struct Pacer {
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl Pacer {
    #[must_use]
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait out the remainder of the interval without blocking the thread.
    pub async fn wait(&mut self) {
        if let Some(delay) = self.remaining() {
            tokio::time::sleep(delay).await;
        }
        self.mark();
    }

    /// Wait out the remainder of the interval by blocking the thread.
    pub fn wait_blocking(&mut self) {
        if let Some(delay) = self.remaining() {
            std::thread::sleep(delay);
        }
        self.mark();
    }

    /// Time still to wait before the next request may go out.
    fn remaining(&self) -> Option<Duration> {
        let elapsed = self.last_request?.elapsed();
        self.min_interval
            .checked_sub(elapsed)
            .filter(|delay| !delay.is_zero())
    }

    fn mark(&mut self) {
        self.last_request = Some(Instant::now());
    }
}
