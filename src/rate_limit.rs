//! Per-Caller Throttling
//!
//! A fixed-window boolean gate: one accepted request per caller per window.
//! Deliberately not a token bucket; the gate either has an unexpired entry
//! for the caller (reject) or it doesn't (accept and stamp). Entries expire
//! lazily on lookup.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Map size at which expired entries are swept during an acquire.
const SWEEP_THRESHOLD: usize = 1024;

/// Fixed-window limiter keyed by an opaque caller identifier.
///
/// Check-and-set happens in one critical section, so two racing calls for
/// the same caller within a window resolve to exactly one acceptance.
pub struct FixedWindowLimiter {
    window: Duration,
    entries: Mutex<HashMap<String, Instant>>,
}

impl FixedWindowLimiter {
    /// Create a limiter with the given throttle window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Try to take the caller's slot for the current window.
    ///
    /// Returns `false` while an earlier acceptance for this caller is
    /// still inside the window.
    pub fn try_acquire(&self, caller_id: &str) -> bool {
        let now = Instant::now();
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if entries.len() >= SWEEP_THRESHOLD {
            entries.retain(|_, stamp| now.duration_since(*stamp) < self.window);
        }

        match entries.get(caller_id) {
            Some(stamp) if now.duration_since(*stamp) < self.window => false,
            _ => {
                entries.insert(caller_id.to_string(), now);
                true
            }
        }
    }

    /// The configured throttle window.
    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn second_call_in_window_is_rejected() {
        let limiter = FixedWindowLimiter::new(Duration::from_secs(60));
        assert!(limiter.try_acquire("user-1"));
        assert!(!limiter.try_acquire("user-1"));
    }

    #[test]
    fn distinct_callers_are_independent() {
        let limiter = FixedWindowLimiter::new(Duration::from_secs(60));
        assert!(limiter.try_acquire("user-1"));
        assert!(limiter.try_acquire("user-2"));
    }

    #[test]
    fn caller_is_accepted_again_after_window_elapses() {
        let limiter = FixedWindowLimiter::new(Duration::from_millis(20));
        assert!(limiter.try_acquire("user-1"));
        assert!(!limiter.try_acquire("user-1"));
        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.try_acquire("user-1"));
    }

    #[test]
    fn racing_calls_for_one_caller_accept_exactly_once() {
        let limiter = Arc::new(FixedWindowLimiter::new(Duration::from_secs(60)));
        let accepted = Arc::new(AtomicU32::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                let accepted = accepted.clone();
                std::thread::spawn(move || {
                    if limiter.try_acquire("shared-caller") {
                        accepted.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(accepted.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn sweep_drops_expired_entries() {
        let limiter = FixedWindowLimiter::new(Duration::from_millis(1));
        for i in 0..SWEEP_THRESHOLD {
            assert!(limiter.try_acquire(&format!("caller-{i}")));
        }
        std::thread::sleep(Duration::from_millis(5));
        assert!(limiter.try_acquire("one-more"));
        let entries = limiter.entries.lock().unwrap();
        assert!(entries.len() < SWEEP_THRESHOLD);
    }
}
