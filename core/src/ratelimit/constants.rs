//! Rate limiting constants.

/// Action key for AI post generation.
pub const ACTION_POST_GENERATE: &str = "post_generate";

/// Action key for repurposing existing content.
pub const ACTION_REPURPOSE: &str = "repurpose";

/// Action key for AI comment generation.
pub const ACTION_COMMENT_GENERATE: &str = "comment_generate";

/// Action key for post breakdown analysis.
pub const ACTION_BREAKDOWN: &str = "breakdown";

/// Action key for publishing a post to LinkedIn.
pub const ACTION_LINKEDIN_PUBLISH: &str = "linkedin_publish";

/// Default quota window in seconds (one rolling hour).
pub const DEFAULT_WINDOW_SECS: u64 = 3600;

/// Milliseconds per minute, for retry-after math.
pub const MS_PER_MINUTE: u64 = 60_000;
