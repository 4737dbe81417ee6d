//! Rate limiting configuration.

use crate::ratelimit::constants::{
    ACTION_BREAKDOWN, ACTION_COMMENT_GENERATE, ACTION_LINKEDIN_PUBLISH, ACTION_POST_GENERATE,
    ACTION_REPURPOSE, DEFAULT_WINDOW_SECS,
};

/// Configuration for the rate limiting system.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Whether rate limiting is enforced
    pub enabled: bool,
    /// Rolling window duration in seconds
    pub window_secs: u64,
    /// Per-action quotas
    pub quotas: ActionQuotas,
}

/// Calls allowed per rolling window, per subject and action.
///
/// Action names not covered by a named field fall back to `default_limit`.
/// This table is static configuration, not derived data.
#[derive(Debug, Clone)]
pub struct ActionQuotas {
    /// AI post generation
    pub post_generate: u32,
    /// Repurposing existing content
    pub repurpose: u32,
    /// AI comment generation
    pub comment_generate: u32,
    /// Post breakdown analysis
    pub breakdown: u32,
    /// Publishing to LinkedIn
    pub linkedin_publish: u32,
    /// Any action without a named quota
    pub default_limit: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_secs: DEFAULT_WINDOW_SECS,
            quotas: ActionQuotas::default(),
        }
    }
}

impl Default for ActionQuotas {
    fn default() -> Self {
        Self {
            post_generate: 20,
            repurpose: 10,
            comment_generate: 30,
            breakdown: 20,
            linkedin_publish: 10,
            default_limit: 15,
        }
    }
}

impl ActionQuotas {
    /// Returns the quota for a raw action key.
    ///
    /// Unrecognized action names use `default_limit`, never the quota of a
    /// named action.
    pub fn limit_for(&self, action: &str) -> u32 {
        match action {
            ACTION_POST_GENERATE => self.post_generate,
            ACTION_REPURPOSE => self.repurpose,
            ACTION_COMMENT_GENERATE => self.comment_generate,
            ACTION_BREAKDOWN => self.breakdown,
            ACTION_LINKEDIN_PUBLISH => self.linkedin_publish,
            _ => self.default_limit,
        }
    }
}

impl RateLimitConfig {
    /// Creates configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RATE_LIMIT_ENABLED`: Enable/disable rate limiting (default: true)
    /// - `RATE_LIMIT_WINDOW_SECS`: Rolling window in seconds (default: 3600)
    /// - `RATE_LIMIT_POST_GENERATE`: Post generation quota (default: 20)
    /// - `RATE_LIMIT_REPURPOSE`: Repurpose quota (default: 10)
    /// - `RATE_LIMIT_COMMENT_GENERATE`: Comment generation quota (default: 30)
    /// - `RATE_LIMIT_BREAKDOWN`: Breakdown quota (default: 20)
    /// - `RATE_LIMIT_LINKEDIN_PUBLISH`: LinkedIn publish quota (default: 10)
    /// - `RATE_LIMIT_DEFAULT`: Quota for unnamed actions (default: 15)
    ///
    /// Malformed values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("RATE_LIMIT_ENABLED") {
            config.enabled = val.parse().unwrap_or(true);
        }
        if let Ok(val) = std::env::var("RATE_LIMIT_WINDOW_SECS") {
            if let Some(secs) = parse_quota(&val) {
                config.window_secs = u64::from(secs);
            }
        }
        if let Ok(val) = std::env::var("RATE_LIMIT_POST_GENERATE") {
            if let Some(limit) = parse_quota(&val) {
                config.quotas.post_generate = limit;
            }
        }
        if let Ok(val) = std::env::var("RATE_LIMIT_REPURPOSE") {
            if let Some(limit) = parse_quota(&val) {
                config.quotas.repurpose = limit;
            }
        }
        if let Ok(val) = std::env::var("RATE_LIMIT_COMMENT_GENERATE") {
            if let Some(limit) = parse_quota(&val) {
                config.quotas.comment_generate = limit;
            }
        }
        if let Ok(val) = std::env::var("RATE_LIMIT_BREAKDOWN") {
            if let Some(limit) = parse_quota(&val) {
                config.quotas.breakdown = limit;
            }
        }
        if let Ok(val) = std::env::var("RATE_LIMIT_LINKEDIN_PUBLISH") {
            if let Some(limit) = parse_quota(&val) {
                config.quotas.linkedin_publish = limit;
            }
        }
        if let Ok(val) = std::env::var("RATE_LIMIT_DEFAULT") {
            if let Some(limit) = parse_quota(&val) {
                config.quotas.default_limit = limit;
            }
        }

        config
    }
}

/// Parses a quota value from its decimal string form.
fn parse_quota(val: &str) -> Option<u32> {
    val.trim().parse().ok()
}
