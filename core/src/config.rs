//! Process Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;

use crate::ratelimit::RateLimitConfig;
use crate::tokens::{CryptoError, TokenCipher};

/// Process configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Token encryption key (64-character hex string, 32 bytes decoded)
    pub token_encryption_key: Option<String>,

    /// Rate limiting settings
    pub rate_limit: RateLimitConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A present-but-malformed `TOKEN_ENCRYPTION_KEY` is rejected here so a
    /// bad deployment fails at startup instead of at the first credential
    /// write. A missing key only fails once something asks for the cipher,
    /// leaving encryption-independent routes serviceable.
    pub fn from_env() -> Result<Self> {
        let token_encryption_key = match env::var("TOKEN_ENCRYPTION_KEY") {
            Ok(hex_key) => {
                TokenCipher::from_hex(&hex_key)
                    .context("TOKEN_ENCRYPTION_KEY must be a 64-character hex string (32 bytes)")?;
                Some(hex_key)
            }
            Err(_) => None,
        };

        Ok(Self {
            token_encryption_key,
            rate_limit: RateLimitConfig::from_env(),
        })
    }

    /// Returns the token cipher for encryption-dependent call sites.
    ///
    /// # Errors
    /// [`CryptoError::MissingKey`] when `TOKEN_ENCRYPTION_KEY` was not set.
    pub fn token_cipher(&self) -> Result<TokenCipher, CryptoError> {
        match &self.token_encryption_key {
            Some(hex_key) => TokenCipher::from_hex(hex_key),
            None => Err(CryptoError::MissingKey),
        }
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            token_encryption_key: Some("0f".repeat(32)),
            rate_limit: RateLimitConfig::default(),
        }
    }
}
