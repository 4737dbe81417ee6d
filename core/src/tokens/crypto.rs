//! OAuth Token Encryption
//!
//! Provides AES-256-GCM encryption for connected-account access tokens
//! stored in the database. Tokens are never persisted in plaintext.
//!
//! Wire format: nonce, authentication tag, and ciphertext are each
//! base64-encoded, joined with `:`, and the joined string is base64-encoded
//! once more. The outer layer keeps the stored blob free of delimiters so it
//! can travel anywhere a plain token could.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;
use zeroize::Zeroizing;

/// Required key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

/// GCM authentication tag length in bytes.
const TAG_LEN: usize = 16;

/// Separator between the encoded nonce, tag, and ciphertext. Not part of
/// either base64 alphabet, so splitting is unambiguous.
const PART_SEPARATOR: char = ':';

/// Token encryption errors.
///
/// Messages never carry key material, ciphertext, or raw binary.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("TOKEN_ENCRYPTION_KEY must be set to a 64-character hex string (32 bytes)")]
    MissingKey,

    #[error("Invalid encryption key length (expected 32 bytes, got {0})")]
    InvalidKeyLength(usize),

    #[error("Encryption key is not valid hex: {0}")]
    InvalidKeyEncoding(#[from] hex::FromHexError),

    #[error("Malformed encrypted token")]
    MalformedToken,

    #[error("Token encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Token decryption failed: {0}")]
    DecryptionFailed(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;

/// Encrypt an access token using AES-256-GCM.
///
/// # Arguments
/// * `token` - The plaintext token (e.g. a LinkedIn access token)
/// * `key` - 32-byte encryption key
///
/// # Returns
/// An opaque base64 blob wrapping `nonce:tag:ciphertext` (each part itself
/// base64).
///
/// A fresh 96-bit nonce is drawn from the OS RNG on every call; nonce reuse
/// under one key breaks GCM.
pub fn encrypt_token(token: &str, key: &[u8]) -> CryptoResult<String> {
    if key.len() != KEY_LEN {
        return Err(CryptoError::InvalidKeyLength(key.len()));
    }

    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let sealed = cipher
        .encrypt(&nonce, token.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    // `encrypt` returns ciphertext || tag; the wire format keeps them apart.
    let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);

    let joined = format!(
        "{}{sep}{}{sep}{}",
        BASE64.encode(nonce),
        BASE64.encode(tag),
        BASE64.encode(ciphertext),
        sep = PART_SEPARATOR,
    );

    Ok(BASE64.encode(joined))
}

/// Decrypt a token previously produced by [`encrypt_token`].
///
/// # Arguments
/// * `blob` - The base64 blob returned by [`encrypt_token`]
/// * `key` - 32-byte encryption key (same as used for encryption)
///
/// # Returns
/// The original plaintext token.
///
/// # Errors
/// [`CryptoError::MalformedToken`] when the blob does not decompose into
/// exactly three delimited base64 parts of the right shapes;
/// [`CryptoError::DecryptionFailed`] when the authentication tag does not
/// verify (tampering or wrong key) or the plaintext is not valid UTF-8.
pub fn decrypt_token(blob: &str, key: &[u8]) -> CryptoResult<String> {
    if key.len() != KEY_LEN {
        return Err(CryptoError::InvalidKeyLength(key.len()));
    }

    let joined = BASE64
        .decode(blob)
        .map_err(|_| CryptoError::MalformedToken)?;
    let joined = String::from_utf8(joined).map_err(|_| CryptoError::MalformedToken)?;

    let parts: Vec<&str> = joined.split(PART_SEPARATOR).collect();
    let [nonce_b64, tag_b64, ciphertext_b64] = parts.as_slice() else {
        return Err(CryptoError::MalformedToken);
    };

    let nonce = BASE64
        .decode(nonce_b64)
        .map_err(|_| CryptoError::MalformedToken)?;
    let tag = BASE64
        .decode(tag_b64)
        .map_err(|_| CryptoError::MalformedToken)?;
    let ciphertext = BASE64
        .decode(ciphertext_b64)
        .map_err(|_| CryptoError::MalformedToken)?;

    if nonce.len() != NONCE_LEN || tag.len() != TAG_LEN {
        return Err(CryptoError::MalformedToken);
    }

    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;

    let mut sealed = ciphertext;
    sealed.extend_from_slice(&tag);

    let plaintext = cipher
        .decrypt(Nonce::from_slice(&nonce), sealed.as_slice())
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;

    String::from_utf8(plaintext)
        .map_err(|e| CryptoError::DecryptionFailed(format!("Invalid UTF-8: {e}")))
}

/// Cipher handle holding the validated 32-byte token encryption key.
///
/// Constructed once at startup (see `Config::token_cipher`) and shared with
/// the route handlers that persist or use connected-account tokens. The key
/// is zeroed on drop, and the type intentionally has no `Debug` impl.
#[derive(Clone)]
pub struct TokenCipher {
    key: Zeroizing<[u8; KEY_LEN]>,
}

impl TokenCipher {
    /// Builds a cipher from a 64-character hex-encoded key.
    ///
    /// # Errors
    /// [`CryptoError::InvalidKeyEncoding`] when the string is not valid hex;
    /// [`CryptoError::InvalidKeyLength`] when it does not decode to exactly
    /// 32 bytes.
    pub fn from_hex(key_hex: &str) -> CryptoResult<Self> {
        let bytes = Zeroizing::new(hex::decode(key_hex.trim())?);
        let key: [u8; KEY_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength(bytes.len()))?;
        Ok(Self {
            key: Zeroizing::new(key),
        })
    }

    /// Encrypts a plaintext token for storage.
    pub fn encrypt(&self, token: &str) -> CryptoResult<String> {
        encrypt_token(token, self.key.as_slice())
    }

    /// Decrypts a stored blob back to the original token.
    pub fn decrypt(&self, blob: &str) -> CryptoResult<String> {
        decrypt_token(blob, self.key.as_slice())
    }
}
