// src/ratelimit.rs
//! Rolling-window limiter for outbound API calls.
//!
//! Leaky-bucket-by-eviction: admission timestamps are pruned to the trailing
//! 60-second window on every acquire; when the window is full the caller
//! sleeps until the oldest admission ages out, plus a fixed 1-second safety
//! margin. Intentionally imprecise: the margin may over-wait slightly.
//! State is in-memory and per-run; there is no cross-process coordination.

use std::collections::VecDeque;
use std::sync::Mutex;

use tokio::time::{sleep, Duration, Instant};

const WINDOW: Duration = Duration::from_secs(60);
const SAFETY_MARGIN: Duration = Duration::from_secs(1);

/// Owns its admission timestamps; pass by reference to every call site
/// instead of relying on ambient global state.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    calls: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(calls_per_minute: usize) -> Self {
        Self {
            max_calls: calls_per_minute.max(1),
            calls: Mutex::new(VecDeque::new()),
        }
    }

    /// Block until admitting one more call would not exceed the configured
    /// ceiling within the trailing 60 seconds, then record the admission.
    ///
    /// Uses `tokio::time`, so tests can drive it under a paused clock.
    pub async fn acquire(&self) {
        let wait = {
            let mut calls = self.calls.lock().expect("rate limiter mutex poisoned");
            let now = Instant::now();
            Self::prune(&mut calls, now);

            if calls.len() >= self.max_calls {
                calls
                    .front()
                    .map(|oldest| WINDOW.saturating_sub(now - *oldest) + SAFETY_MARGIN)
                    .unwrap_or(Duration::ZERO)
            } else {
                Duration::ZERO
            }
        };

        if !wait.is_zero() {
            tracing::info!(wait_secs = wait.as_secs_f64(), "rate limit reached, waiting");
            sleep(wait).await;
        }

        let mut calls = self.calls.lock().expect("rate limiter mutex poisoned");
        let now = Instant::now();
        Self::prune(&mut calls, now);
        calls.push_back(now);
    }

    fn prune(calls: &mut VecDeque<Instant>, now: Instant) {
        while let Some(oldest) = calls.front() {
            if now - *oldest >= WINDOW {
                calls.pop_front();
            } else {
                break;
            }
        }
    }

    /// Admissions currently inside the trailing window (diagnostics/tests).
    pub fn in_flight(&self) -> usize {
        let mut calls = self.calls.lock().expect("rate limiter mutex poisoned");
        Self::prune(&mut calls, Instant::now());
        calls.len()
    }
}
