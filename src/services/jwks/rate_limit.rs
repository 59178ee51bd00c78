use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Sliding-window limiter for outbound JWKS fetches.
#[derive(Debug)]
pub struct LookupRateLimiter {
    max_per_window: u32,
    window: Duration,
    hits: Mutex<VecDeque<Instant>>,
}

impl LookupRateLimiter {
    pub fn per_minute(max_per_window: u32) -> Self {
        Self::new(max_per_window, Duration::from_secs(60))
    }

    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
            hits: Mutex::new(VecDeque::new()),
        }
    }

    /// Take a slot if one is free in the current window.
    pub async fn try_acquire(&self) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.lock().await;

        while let Some(oldest) = hits.front() {
            if now.duration_since(*oldest) >= self.window {
                hits.pop_front();
            } else {
                break;
            }
        }

        if hits.len() as u32 >= self.max_per_window {
            return false;
        }

        hits.push_back(now);
        true
    }
}
