use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Configuration for locking out usernames after repeated failed logins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginThrottleConfig {
    /// Whether failed logins are tracked at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Failures tolerated inside the window before the username is locked
    #[serde(default = "default_max_failures")]
    pub max_failures: u32,

    /// Sliding window in seconds over which failures are counted
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// How long a locked username stays locked, in seconds
    #[serde(default = "default_lockout_secs")]
    pub lockout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_max_failures() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    300 // 5 minutes
}

fn default_lockout_secs() -> u64 {
    900 // 15 minutes
}

impl Default for LoginThrottleConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_failures: default_max_failures(),
            window_secs: default_window_secs(),
            lockout_secs: default_lockout_secs(),
        }
    }
}

/// How long a caller is told to wait when the remaining attempts are all in flight.
const PENDING_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Failed login attempts recorded for one username.
#[derive(Debug, Clone, Default)]
struct FailureHistory {
    failures: Vec<Instant>,
    /// Attempts admitted but not yet resolved
    in_flight: u32,
    locked_until: Option<Instant>,
}

impl FailureHistory {
    fn remaining_lockout(&self, now: Instant) -> Option<Duration> {
        self.locked_until
            .filter(|&until| now < until)
            .map(|until| until - now)
    }

    fn forget_failures_before(&mut self, now: Instant, window: Duration) {
        self.failures
            .retain(|&failed_at| now.duration_since(failed_at) < window);
    }
}

/// In-memory tracker of failed logins per username.
///
/// Each attempt reserves a slot before the password is checked, and pending
/// attempts count against `max_failures`. Concurrent guesses therefore cannot
/// exceed the limit. Unknown usernames are tracked exactly like real ones, so
/// a lockout does not reveal whether an account exists.
#[derive(Clone, Debug)]
pub struct LoginThrottle {
    config: Arc<LoginThrottleConfig>,
    histories: Arc<DashMap<String, FailureHistory>>,
}

impl LoginThrottle {
    pub fn new(config: LoginThrottleConfig) -> Self {
        Self {
            config: Arc::new(config),
            histories: Arc::new(DashMap::new()),
        }
    }

    /// Admit a login attempt for `username`, or return how long to wait.
    ///
    /// The returned attempt must be resolved with [`LoginAttempt::failed`] or
    /// [`LoginAttempt::succeeded`]; dropping it unresolved releases the slot.
    pub fn begin_attempt(&self, username: &str) -> Result<LoginAttempt<'_>, Duration> {
        if !self.config.enabled {
            return Ok(LoginAttempt::untracked(self, username));
        }

        let now = Instant::now();
        let window = Duration::from_secs(self.config.window_secs);

        let mut entry = self.histories.entry(username.to_string()).or_default();
        let history = entry.value_mut();

        if let Some(remaining) = history.remaining_lockout(now) {
            debug!(
                username,
                remaining_secs = remaining.as_secs(),
                "Login attempt rejected while locked"
            );
            return Err(remaining);
        }

        // An expired lock starts the username over with a clean slate
        if history.locked_until.take().is_some() {
            history.failures.clear();
        }
        history.forget_failures_before(now, window);

        let reserved = history.failures.len() + history.in_flight as usize;
        if reserved >= self.config.max_failures as usize {
            debug!(
                username,
                in_flight = history.in_flight,
                "Login attempt rejected, remaining attempts are in flight"
            );
            return Err(PENDING_RETRY_AFTER);
        }

        history.in_flight += 1;

        Ok(LoginAttempt {
            throttle: self,
            username: username.to_string(),
            tracked: true,
        })
    }

    fn release(&self, username: &str) {
        if let Some(mut history) = self.histories.get_mut(username) {
            history.in_flight = history.in_flight.saturating_sub(1);
        }
    }

    fn record_failure(&self, username: &str) -> Option<Duration> {
        let now = Instant::now();
        let window = Duration::from_secs(self.config.window_secs);

        let mut entry = self.histories.entry(username.to_string()).or_default();
        let history = entry.value_mut();

        history.in_flight = history.in_flight.saturating_sub(1);
        history.forget_failures_before(now, window);
        history.failures.push(now);

        if history.failures.len() < self.config.max_failures as usize {
            return None;
        }

        let lockout = Duration::from_secs(self.config.lockout_secs);
        history.locked_until = Some(now + lockout);

        warn!(
            username,
            failures = history.failures.len(),
            lockout_secs = lockout.as_secs(),
            "Too many failed logins, locking username"
        );

        Some(lockout)
    }

    fn record_success(&self, username: &str) {
        if let Some(mut history) = self.histories.get_mut(username) {
            history.in_flight = history.in_flight.saturating_sub(1);
            history.failures.clear();
            history.locked_until = None;
        }
    }

    /// Remove histories with no recent failures, no active lock and nothing in flight.
    ///
    /// Called periodically to keep memory bounded.
    pub fn cleanup_expired_entries(&self) {
        let now = Instant::now();
        let window = Duration::from_secs(self.config.window_secs);

        self.histories.retain(|_username, history| {
            history.in_flight > 0
                || history.remaining_lockout(now).is_some()
                || history
                    .failures
                    .last()
                    .is_some_and(|&failed_at| now.duration_since(failed_at) < window)
        });
    }

    #[cfg(test)]
    fn tracked_usernames(&self) -> usize {
        self.histories.len()
    }
}

/// A login attempt admitted by [`LoginThrottle::begin_attempt`].
#[derive(Debug)]
#[must_use = "an unresolved attempt is released without being counted"]
pub struct LoginAttempt<'a> {
    throttle: &'a LoginThrottle,
    username: String,
    tracked: bool,
}

impl<'a> LoginAttempt<'a> {
    fn untracked(throttle: &'a LoginThrottle, username: &str) -> Self {
        Self {
            throttle,
            username: username.to_string(),
            tracked: false,
        }
    }

    /// Count the attempt as a failure. Returns the lockout if it triggered one.
    pub fn failed(mut self) -> Option<Duration> {
        if !std::mem::take(&mut self.tracked) {
            return None;
        }

        self.throttle.record_failure(&self.username)
    }

    /// Forget the username's failure history.
    pub fn succeeded(mut self) {
        if std::mem::take(&mut self.tracked) {
            self.throttle.record_success(&self.username);
        }
    }
}

impl Drop for LoginAttempt<'_> {
    fn drop(&mut self) {
        // Cancelled before resolving, e.g. the client went away mid-request
        if self.tracked {
            self.throttle.release(&self.username);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn throttle(max_failures: u32, lockout_secs: u64) -> LoginThrottle {
        LoginThrottle::new(LoginThrottleConfig {
            enabled: true,
            max_failures,
            window_secs: 60,
            lockout_secs,
        })
    }

    fn fail(throttle: &LoginThrottle, username: &str) -> Option<Duration> {
        throttle
            .begin_attempt(username)
            .expect("Attempt should be admitted")
            .failed()
    }

    #[test]
    fn test_allows_attempts_below_the_limit() {
        let throttle = throttle(3, 60);

        assert!(fail(&throttle, "alice").is_none());
        assert!(fail(&throttle, "alice").is_none());
        assert!(throttle.begin_attempt("alice").is_ok());
    }

    #[test]
    fn test_locks_after_max_failures() {
        let throttle = throttle(3, 60);

        fail(&throttle, "alice");
        fail(&throttle, "alice");
        let lockout = fail(&throttle, "alice");

        assert_eq!(lockout, Some(Duration::from_secs(60)));
        assert!(throttle.begin_attempt("alice").is_err());
    }

    #[test]
    fn test_pending_attempts_count_against_the_limit() {
        let throttle = throttle(3, 60);

        let attempts: Vec<_> = (0..3)
            .map(|_| throttle.begin_attempt("alice").expect("Attempt should be admitted"))
            .collect();

        assert_eq!(
            throttle.begin_attempt("alice").err(),
            Some(PENDING_RETRY_AFTER)
        );

        let lockouts: Vec<_> = attempts.into_iter().map(LoginAttempt::failed).collect();
        assert_eq!(lockouts.iter().flatten().count(), 1);
        assert!(throttle.begin_attempt("alice").is_err());
    }

    #[test]
    fn test_dropped_attempt_frees_its_slot() {
        let throttle = throttle(1, 60);

        drop(throttle.begin_attempt("alice").expect("Attempt should be admitted"));

        assert!(throttle.begin_attempt("alice").is_ok());
    }

    #[test]
    fn test_usernames_are_tracked_independently() {
        let throttle = throttle(1, 60);

        fail(&throttle, "alice");

        assert!(throttle.begin_attempt("alice").is_err());
        assert!(throttle.begin_attempt("bob").is_ok());
    }

    #[test]
    fn test_success_clears_history() {
        let throttle = throttle(2, 60);

        fail(&throttle, "alice");
        throttle
            .begin_attempt("alice")
            .expect("Attempt should be admitted")
            .succeeded();

        assert!(fail(&throttle, "alice").is_none());
        assert!(throttle.begin_attempt("alice").is_ok());
    }

    #[test]
    fn test_expired_lock_is_released() {
        let throttle = throttle(1, 0);

        assert!(fail(&throttle, "alice").is_some());
        // The released username starts counting from zero again
        assert!(fail(&throttle, "alice").is_some());
    }

    #[test]
    fn test_disabled_throttle_never_locks() {
        let throttle = LoginThrottle::new(LoginThrottleConfig {
            enabled: false,
            max_failures: 1,
            window_secs: 60,
            lockout_secs: 60,
        });

        for _ in 0..10 {
            assert!(fail(&throttle, "alice").is_none());
        }
        assert!(throttle.begin_attempt("alice").is_ok());
        assert_eq!(throttle.tracked_usernames(), 0);
    }

    #[test]
    fn test_cleanup_keeps_locked_and_pending_entries() {
        let throttle = throttle(1, 60);

        fail(&throttle, "locked");
        let pending = throttle.begin_attempt("pending").expect("Attempt should be admitted");
        throttle.cleanup_expired_entries();

        assert_eq!(throttle.tracked_usernames(), 2);
        drop(pending);

        let unlocked = LoginThrottle::new(LoginThrottleConfig {
            enabled: true,
            max_failures: 10,
            window_secs: 0,
            lockout_secs: 60,
        });
        fail(&unlocked, "stale");
        unlocked.cleanup_expired_entries();

        assert_eq!(unlocked.tracked_usernames(), 0);
    }
}
