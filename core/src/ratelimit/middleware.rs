//! Axum middleware for rate limiting metered actions.
//!
//! Routes performing a metered action tag themselves with `with_action`;
//! `rate_limit_by_user` then enforces the per-subject quota for that action
//! and surfaces rejections as `429 Too Many Requests`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::ratelimit::{AuthSubject, MeteredAction, RateLimitError, RateLimiter};

/// Middleware enforcing the per-user quota for the route's metered action.
///
/// Reads [`MeteredAction`] (set by [`with_action`]) and [`AuthSubject`] (set
/// by the auth layer) from request extensions. Requests carrying neither
/// pass through untouched: routes that never tagged an action are not
/// metered, and rejecting unauthenticated traffic is the auth layer's job.
///
/// # Usage
///
/// ```ignore
/// use axum::middleware::{from_fn, from_fn_with_state};
///
/// Router::new()
///     .route("/api/generate", post(generate_handler))
///     .layer(from_fn_with_state(limiter.clone(), rate_limit_by_user))
///     .layer(from_fn(with_action(ACTION_POST_GENERATE)))
/// ```
///
/// # Errors
/// Returns [`RateLimitError`] (rendered as `429 Too Many Requests` with a
/// `Retry-After` header) when the subject has exhausted the action's quota.
pub async fn rate_limit_by_user(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let Some(MeteredAction(action)) = request.extensions().get::<MeteredAction>().copied() else {
        return Ok(next.run(request).await);
    };

    let Some(subject) = request.extensions().get::<AuthSubject>().cloned() else {
        debug!(action = %action, "No authenticated subject, skipping rate limit");
        return Ok(next.run(request).await);
    };

    limiter.check(&subject.0, action)?;
    Ok(next.run(request).await)
}

/// Tags requests with the metered action for downstream middleware.
///
/// Apply before `rate_limit_by_user` so the limiter knows which quota the
/// route consumes.
pub fn with_action(
    action: &'static str,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
       + Clone
       + Send
       + 'static {
    move |mut request: Request, next: Next| {
        request.extensions_mut().insert(MeteredAction(action));
        Box::pin(async move { next.run(request).await })
    }
}
