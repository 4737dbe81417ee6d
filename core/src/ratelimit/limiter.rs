//! Core in-memory rate limiter.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::ratelimit::{RateLimitConfig, RateLimitError, MS_PER_MINUTE};

/// Sliding-window rate limiter over an in-memory timestamp store.
///
/// Each allowed call records one epoch-ms timestamp under a
/// `"{subject}:{action}"` key. A call is rejected once the count of
/// timestamps inside the rolling window reaches the action's quota. Entries
/// older than the window are purged lazily on the next check for that key,
/// never proactively.
///
/// The store is process-local and vanishes on restart; a multi-process
/// deployment needs a shared atomic counter behind this same surface.
/// Cloning is cheap and all clones share one store.
#[derive(Clone)]
pub struct RateLimiter {
    config: Arc<RateLimitConfig>,
    store: Arc<DashMap<String, Vec<u64>>>,
}

impl RateLimiter {
    /// Creates a new rate limiter with the given configuration.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(DashMap::new()),
        }
    }

    /// Checks and records a call for `(subject_id, action)` at the current
    /// wall-clock time.
    ///
    /// On success the call is counted against the quota. On rejection
    /// nothing is recorded and the error carries the whole minutes until the
    /// oldest counted call leaves the window.
    ///
    /// # Errors
    /// Returns [`RateLimitError::LimitExceeded`] when the quota is exhausted.
    pub fn check(&self, subject_id: &str, action: &str) -> Result<(), RateLimitError> {
        self.check_at(subject_id, action, epoch_ms())
    }

    /// Deterministic-clock variant of [`Self::check`].
    ///
    /// `now_ms` is the call time in epoch milliseconds. Tests drive window
    /// expiry through this instead of sleeping.
    pub fn check_at(
        &self,
        subject_id: &str,
        action: &str,
        now_ms: u64,
    ) -> Result<(), RateLimitError> {
        if !self.config.enabled {
            return Ok(());
        }

        let limit = self.config.quotas.limit_for(action);
        let window_ms = self.config.window_secs * 1000;
        let key = build_key(subject_id, action);

        // The entry guard pins the shard for the whole prune-check-append
        // sequence, and nothing in it yields.
        let mut timestamps = self.store.entry(key).or_default();
        let window_start = now_ms.saturating_sub(window_ms);
        timestamps.retain(|&ts| ts > window_start);

        if timestamps.len() as u64 >= u64::from(limit) {
            let oldest = timestamps.first().copied().unwrap_or(now_ms);
            let minutes_left = (oldest + window_ms)
                .saturating_sub(now_ms)
                .div_ceil(MS_PER_MINUTE);
            warn!(
                subject = %subject_id,
                action = %action,
                limit = limit,
                minutes_left = minutes_left,
                "Rate limit exceeded"
            );
            return Err(RateLimitError::LimitExceeded {
                limit,
                minutes_left,
            });
        }

        timestamps.push(now_ms);
        debug!(
            subject = %subject_id,
            action = %action,
            used = timestamps.len(),
            limit = limit,
            "Rate limit check passed"
        );
        Ok(())
    }

    /// Returns the configuration for this rate limiter.
    #[must_use]
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

/// Builds the composite store key for a subject and action.
fn build_key(subject_id: &str, action: &str) -> String {
    format!("{subject_id}:{action}")
}

/// Current wall-clock time in epoch milliseconds.
fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use crate::ratelimit::{ActionQuotas, ACTION_POST_GENERATE, DEFAULT_WINDOW_SECS};

    use super::*;

    const HOUR_MS: u64 = DEFAULT_WINDOW_SECS * 1000;
    const T0: u64 = 1_700_000_000_000;

    fn limiter_with_quota(limit: u32) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            enabled: true,
            window_secs: DEFAULT_WINDOW_SECS,
            quotas: ActionQuotas {
                post_generate: limit,
                ..ActionQuotas::default()
            },
        })
    }

    #[test]
    fn test_build_key() {
        assert_eq!(build_key("user_1", "post_generate"), "user_1:post_generate");
    }

    #[test]
    fn test_allows_up_to_limit_then_rejects() {
        let limiter = limiter_with_quota(3);

        for i in 0..3 {
            limiter
                .check_at("user_1", ACTION_POST_GENERATE, T0 + i)
                .expect("call within quota should pass");
        }

        let err = limiter
            .check_at("user_1", ACTION_POST_GENERATE, T0 + 3)
            .expect_err("call over quota should fail");
        assert!(matches!(
            err,
            RateLimitError::LimitExceeded { limit: 3, .. }
        ));
    }

    #[test]
    fn test_minutes_left_counts_from_oldest_call() {
        let limiter = limiter_with_quota(1);

        limiter
            .check_at("user_1", ACTION_POST_GENERATE, T0)
            .expect("first call should pass");

        // Half an hour in, the oldest call still has 30 minutes to live.
        let err = limiter
            .check_at("user_1", ACTION_POST_GENERATE, T0 + 30 * MS_PER_MINUTE)
            .expect_err("second call should be rejected");
        assert_eq!(
            err,
            RateLimitError::LimitExceeded {
                limit: 1,
                minutes_left: 30,
            }
        );

        // A fraction of a minute left still rounds up to one whole minute.
        let err = limiter
            .check_at(
                "user_1",
                ACTION_POST_GENERATE,
                T0 + HOUR_MS - MS_PER_MINUTE / 2,
            )
            .expect_err("call just before expiry should be rejected");
        assert_eq!(
            err,
            RateLimitError::LimitExceeded {
                limit: 1,
                minutes_left: 1,
            }
        );
    }

    #[test]
    fn test_window_slides_rather_than_resets() {
        let limiter = limiter_with_quota(2);

        limiter
            .check_at("user_1", ACTION_POST_GENERATE, T0)
            .unwrap();
        limiter
            .check_at("user_1", ACTION_POST_GENERATE, T0 + 10 * MS_PER_MINUTE)
            .unwrap();

        // Quota exhausted mid-window.
        assert!(limiter
            .check_at("user_1", ACTION_POST_GENERATE, T0 + 30 * MS_PER_MINUTE)
            .is_err());

        // One hour after the first call it falls out of the window and a
        // slot opens, even though the second call is still counted.
        limiter
            .check_at("user_1", ACTION_POST_GENERATE, T0 + HOUR_MS)
            .expect("slot should open once the oldest call expires");

        // Both surviving calls are now inside the window again.
        let err = limiter
            .check_at("user_1", ACTION_POST_GENERATE, T0 + HOUR_MS + 1)
            .expect_err("quota should be exhausted again");
        assert_eq!(
            err,
            RateLimitError::LimitExceeded {
                limit: 2,
                minutes_left: 10,
            }
        );
    }

    #[test]
    fn test_rejected_calls_do_not_consume_quota() {
        let limiter = limiter_with_quota(1);

        limiter
            .check_at("user_1", ACTION_POST_GENERATE, T0)
            .unwrap();

        // Rejections half way through must not extend the wait.
        for i in 1..=5 {
            assert!(limiter
                .check_at("user_1", ACTION_POST_GENERATE, T0 + i * MS_PER_MINUTE)
                .is_err());
        }

        limiter
            .check_at("user_1", ACTION_POST_GENERATE, T0 + HOUR_MS)
            .expect("only the original call should count against the quota");
    }

    #[test]
    fn test_unknown_action_uses_default_quota() {
        let limiter = RateLimiter::new(RateLimitConfig {
            quotas: ActionQuotas {
                default_limit: 2,
                ..ActionQuotas::default()
            },
            ..RateLimitConfig::default()
        });

        limiter.check_at("user_1", "mystery_feature", T0).unwrap();
        limiter
            .check_at("user_1", "mystery_feature", T0 + 1)
            .unwrap();
        assert!(limiter
            .check_at("user_1", "mystery_feature", T0 + 2)
            .is_err());
    }

    #[test]
    fn test_disabled_limiter_allows_everything() {
        let limiter = RateLimiter::new(RateLimitConfig {
            enabled: false,
            ..RateLimitConfig::default()
        });

        for i in 0..100 {
            limiter
                .check_at("user_1", ACTION_POST_GENERATE, T0 + i)
                .expect("disabled limiter should never reject");
        }
    }
}
