//! Authormity Core
//!
//! Backend core for the Authormity LinkedIn content platform. Provides
//! per-user rate limiting for AI-metered actions and at-rest encryption for
//! connected-account OAuth tokens. The HTTP route layer, persistence, and
//! third-party API wrappers live outside this crate and consume it as a
//! library.

pub mod config;
pub mod ratelimit;
pub mod tokens;
