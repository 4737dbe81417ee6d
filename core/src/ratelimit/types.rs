//! Rate limiting types.

/// Authenticated subject identifier stored in request extensions.
///
/// Inserted by the auth layer once a request is authenticated; quotas are
/// keyed on it. The inner string is the internal user id, opaque to this
/// module.
#[derive(Debug, Clone)]
pub struct AuthSubject(pub String);

/// Metered action marker stored in request extensions.
///
/// Set per route via `with_action` so downstream middleware knows which
/// quota applies to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeteredAction(pub &'static str);
