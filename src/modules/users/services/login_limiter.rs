use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Fixed-window counter of login attempts per account key.
///
/// Every attempt takes a slot through [`LoginAttemptLimiter::try_acquire`]
/// before the password is checked; a successful login clears the key. Once
/// `max_attempts` slots are taken inside one window, further attempts are
/// refused until the window closes.
#[derive(Debug)]
pub struct LoginAttemptLimiter {
    attempts: DashMap<String, AttemptWindow>,
    max_attempts: u32,
    window: Duration,
}

#[derive(Debug, Clone, Copy)]
struct AttemptWindow {
    attempts: u32,
    started_at: Instant,
}

impl LoginAttemptLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            attempts: DashMap::new(),
            max_attempts: max_attempts.max(1),
            window,
        }
    }

    /// Take an attempt slot for `key`, opening a new window if the old one has
    /// closed. Returns the attempts counted in the current window, or
    /// `Err(retry_after)` while the key is locked out.
    ///
    /// The check and the increment happen under the same map entry lock, so
    /// concurrent attempts can never take more than `max_attempts` slots.
    pub fn try_acquire(&self, key: &str) -> Result<u32, Duration> {
        let now = Instant::now();
        let mut entry = self
            .attempts
            .entry(key.to_string())
            .or_insert(AttemptWindow {
                attempts: 0,
                started_at: now,
            });

        let elapsed = now.saturating_duration_since(entry.started_at);
        if elapsed >= self.window {
            entry.attempts = 0;
            entry.started_at = now;
        } else if entry.attempts >= self.max_attempts {
            return Err(self.window - elapsed);
        }

        entry.attempts += 1;
        Ok(entry.attempts)
    }

    pub fn reset(&self, key: &str) {
        self.attempts.remove(key);
    }

    pub fn clear(&self) {
        self.attempts.clear();
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
