//! Rate limiting module for metering AI-powered actions.
//!
//! Tracks per-(subject, action) call timestamps in memory and enforces a
//! rolling one-hour quota per action. The store is process-local state and
//! stands in for a shared atomic counter in multi-process deployments.

pub mod config;
pub mod constants;
pub mod error;
pub mod limiter;
pub mod middleware;
pub mod types;

pub use config::*;
pub use constants::*;
pub use error::*;
pub use limiter::*;
pub use middleware::{rate_limit_by_user, with_action};
pub use types::*;
