// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-window call limiter keyed by name.
//!
//! A window opens on the first call for a key and lasts `window_seconds`.
//! Once it elapses the next call starts a fresh window with a zero count.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use triage_core::types::RateLimitStatus;
use triage_core::{Clock, SystemClock};

#[derive(Debug, Clone, Copy)]
struct Window {
    calls: u32,
    started_at: Instant,
}

impl Window {
    fn expired(&self, now: Instant, length: Duration) -> bool {
        now.saturating_duration_since(self.started_at) >= length
    }
}

/// Process-wide rate limiter shared by concurrent classifications.
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: DashMap::new(),
            clock,
        }
    }

    /// Record one call under `key` if the current window has room.
    ///
    /// The check and the increment happen under the same entry lock, so two
    /// concurrent callers can never both take the last slot.
    pub fn allow(&self, key: &str, max_calls: u32, window_seconds: u64) -> bool {
        let now = self.clock.now();
        let length = Duration::from_secs(window_seconds);
        let mut window = self.windows.entry(key.to_string()).or_insert(Window {
            calls: 0,
            started_at: now,
        });
        if window.expired(now, length) {
            *window = Window {
                calls: 0,
                started_at: now,
            };
        }
        if window.calls < max_calls {
            window.calls += 1;
            true
        } else {
            false
        }
    }

    /// Report the state of `key` without recording a call.
    pub fn status(&self, key: &str, max_calls: u32, window_seconds: u64) -> RateLimitStatus {
        let now = self.clock.now();
        let length = Duration::from_secs(window_seconds);
        let active = self
            .windows
            .get(key)
            .map(|w| *w)
            .filter(|w| !w.expired(now, length));

        let (calls_made, available_in_seconds) = match active {
            Some(window) => {
                let elapsed = now.saturating_duration_since(window.started_at);
                (window.calls, ceil_secs(length.saturating_sub(elapsed)))
            }
            None => (0, 0),
        };

        RateLimitStatus {
            calls_made,
            max_calls,
            remaining_calls: max_calls.saturating_sub(calls_made),
            window_seconds,
            available_in_seconds,
        }
    }

    /// Forget all state for `key`.
    pub fn clear(&self, key: &str) {
        self.windows.remove(key);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}
