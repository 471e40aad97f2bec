//! Per-user cooldown between served auto-chat requests

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Tracks the last instant each user was served an auto-chat reply.
///
/// Entries are only ever overwritten, never removed, for the lifetime of
/// the process. A user with no entry is always allowed.
pub struct RateLimiter {
    window: Duration,
    served: Mutex<HashMap<String, Instant>>,
}

impl RateLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            served: Mutex::new(HashMap::new()),
        }
    }

    /// Allow the request and record `now` iff the user's cooldown has
    /// elapsed. A denied call leaves the stored timestamp untouched, so
    /// repeated rapid requests keep being measured against the instant
    /// the user was last served.
    pub fn allow(&self, user_id: &str, now: Instant) -> bool {
        // A poisoned lock means another handler panicked mid-update;
        // the map itself is still valid.
        let mut served = match self.served.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match served.get(user_id) {
            Some(&last) if now.duration_since(last) < self.window => false,
            _ => {
                served.insert(user_id.to_string(), now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(5);

    #[test]
    fn first_request_is_always_allowed() {
        let limiter = RateLimiter::new(WINDOW);
        assert!(limiter.allow("42", Instant::now()));
    }

    #[test]
    fn request_within_window_is_denied() {
        let limiter = RateLimiter::new(WINDOW);
        let t0 = Instant::now();
        assert!(limiter.allow("42", t0));
        assert!(!limiter.allow("42", t0 + Duration::from_millis(4999)));
    }

    #[test]
    fn request_at_window_boundary_is_allowed() {
        let limiter = RateLimiter::new(WINDOW);
        let t0 = Instant::now();
        assert!(limiter.allow("42", t0));
        assert!(limiter.allow("42", t0 + WINDOW));
    }

    #[test]
    fn denial_does_not_reset_the_timestamp() {
        let limiter = RateLimiter::new(WINDOW);
        let t0 = Instant::now();
        assert!(limiter.allow("42", t0));

        // Two denials in a row, both measured against t0
        assert!(!limiter.allow("42", t0 + Duration::from_secs(3)));
        assert!(!limiter.allow("42", t0 + Duration::from_secs(4)));

        // Five seconds after t0 the user is served again even though the
        // last denied attempt was only a second ago
        assert!(limiter.allow("42", t0 + WINDOW));
    }

    #[test]
    fn users_are_throttled_independently() {
        let limiter = RateLimiter::new(WINDOW);
        let t0 = Instant::now();
        assert!(limiter.allow("42", t0));
        assert!(limiter.allow("43", t0 + Duration::from_millis(1)));
        assert!(!limiter.allow("42", t0 + Duration::from_millis(2)));
    }
}
