//! Connected-account token handling.
//!
//! OAuth access tokens for external accounts (LinkedIn) are encrypted with
//! AES-256-GCM before they are persisted and decrypted just before outbound
//! API calls. A decryption failure means the stored credential is unusable
//! and the user must reconnect the account; retrying reproduces the same
//! failure.

pub mod crypto;

pub use crypto::*;
