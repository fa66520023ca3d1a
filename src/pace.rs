//! Fixed-interval pacing between translation API calls.
//!
//! The free translation endpoint throttles aggressive clients without
//! documenting its limits, so the bundle translator waits a fixed interval
//! after every string leaf. Tests inject `Pace::none()`.

use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pace {
    interval: Duration,
}

impl Pace {
    /// Pace with a fixed delay after every operation.
    pub fn fixed(interval: Duration) -> Self {
        Self { interval }
    }

    /// No delay at all.
    pub fn none() -> Self {
        Self::fixed(Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Suspend for the configured interval. A zero interval returns immediately.
    pub async fn wait(&self) {
        if !self.interval.is_zero() {
            sleep(self.interval).await;
        }
    }
}

impl Default for Pace {
    /// 600ms, the delay the pipeline has always used against the public endpoint
    fn default() -> Self {
        Self::fixed(Duration::from_millis(600))
    }
}
