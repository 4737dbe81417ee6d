//! Rate limiting error types for HTTP responses.

use std::fmt;

use axum::http::header::HeaderValue;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Errors that can occur during rate limit checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    /// Subject exhausted the quota for an action within the rolling window.
    LimitExceeded {
        /// Quota for the action
        limit: u32,
        /// Whole minutes until the oldest counted call leaves the window
        minutes_left: u64,
    },
}

impl RateLimitError {
    /// Human-readable message surfaced to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::LimitExceeded { minutes_left, .. } => {
                let unit = if *minutes_left == 1 { "minute" } else { "minutes" };
                format!(
                    "Rate limit exceeded. You can use this feature again in {minutes_left} {unit}."
                )
            }
        }
    }
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl std::error::Error for RateLimitError {}

/// JSON response body for rate limit errors.
#[derive(Serialize)]
pub struct RateLimitErrorResponse {
    /// Error code identifier.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Seconds to wait before retrying.
    pub retry_after: u64,
    /// Maximum calls allowed in the window.
    pub limit: u32,
    /// Remaining calls (always 0 when rate limited).
    pub remaining: u32,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let message = self.user_message();
        match self {
            Self::LimitExceeded {
                limit,
                minutes_left,
            } => {
                let retry_after = minutes_left * 60;
                let body = RateLimitErrorResponse {
                    error: "rate_limited",
                    message,
                    retry_after,
                    limit,
                    remaining: 0,
                };
                let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
                let headers = response.headers_mut();
                if let Ok(v) = HeaderValue::from_str(&retry_after.to_string()) {
                    headers.insert("Retry-After", v);
                }
                response
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_pluralizes_minutes() {
        let one = RateLimitError::LimitExceeded {
            limit: 10,
            minutes_left: 1,
        };
        assert_eq!(
            one.user_message(),
            "Rate limit exceeded. You can use this feature again in 1 minute."
        );

        let many = RateLimitError::LimitExceeded {
            limit: 10,
            minutes_left: 42,
        };
        assert_eq!(
            many.user_message(),
            "Rate limit exceeded. You can use this feature again in 42 minutes."
        );
    }

    #[test]
    fn test_display_matches_user_message() {
        let err = RateLimitError::LimitExceeded {
            limit: 5,
            minutes_left: 3,
        };
        assert_eq!(err.to_string(), err.user_message());
    }
}
