// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stratagem

//! Key derivation and authenticated payload encryption.
//!
//! Keys come from PBKDF2-HMAC-SHA-256 at a deliberately slow 200,000
//! rounds over a random 16-byte salt; the salt travels in the container so
//! the decoder can re-derive the same key. Same passphrase + same salt
//! always yields the same key.
//!
//! Encryption is AES-256-GCM-SIV behind the [`AuthenticatedCipher`] trait.
//! The pipeline only sees the trait, so tests can substitute mock
//! primitives. The default implementation produces a self-contained token:
//!
//! ```text
//! [1 byte  ] token version (0x01)
//! [12 bytes] random nonce
//! [N bytes ] ciphertext + 16-byte authentication tag
//! ```
//!
//! The version byte is fed to the cipher as associated data, so the tag
//! covers the token header, the nonce, and the ciphertext. AES-GCM-SIV's
//! nonce-misuse resistance gives an extra safety margin since the nonce is
//! randomly generated per token.

use aes_gcm_siv::aead::{Aead, Payload};
use aes_gcm_siv::{Aes256GcmSiv, KeyInit, Nonce};
use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::stego::error::StegoError;

/// KDF salt length in bytes.
pub const SALT_LEN: usize = 16;
/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;
/// AES-GCM-SIV nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM-SIV authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// PBKDF2 iteration count. Fixed by the container format; changing it
/// breaks decodes of existing images.
pub const PBKDF2_ROUNDS: u32 = 200_000;

/// Current token format version, first token byte.
const TOKEN_VERSION: u8 = 0x01;

/// Fixed token overhead: version(1) + nonce(12) + tag(16) = 29 bytes.
pub const TOKEN_OVERHEAD: usize = 1 + NONCE_LEN + TAG_LEN;

/// Derive the 32-byte encryption key from passphrase + salt.
///
/// Callers must reject empty passphrases before calling; the pipeline does
/// this at its entry points.
pub fn derive_key(passphrase: &str, salt: &[u8; SALT_LEN]) -> Zeroizing<[u8; KEY_LEN]> {
    debug_assert!(!passphrase.is_empty(), "empty passphrase must be rejected by the caller");
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::<Hmac<Sha256>>(passphrase.as_bytes(), salt, PBKDF2_ROUNDS, &mut *key)
        .expect("PBKDF2 key derivation should not fail");
    key
}

/// Generate a fresh random KDF salt. Never reused across encodes.
pub fn generate_salt() -> [u8; SALT_LEN] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// Authenticated encryption primitive used by the pipeline.
///
/// Implementations must fail closed: `decrypt` never returns unverified or
/// partially-decrypted bytes.
pub trait AuthenticatedCipher {
    /// Encrypt `plaintext` under `key` into a self-contained token.
    fn encrypt(&self, key: &[u8; KEY_LEN], plaintext: &[u8]) -> Vec<u8>;

    /// Verify and decrypt a token produced by [`encrypt`](Self::encrypt).
    ///
    /// # Errors
    /// [`StegoError::AuthenticationFailed`] on a malformed token, unknown
    /// token version, wrong key, or tag mismatch.
    fn decrypt(&self, key: &[u8; KEY_LEN], token: &[u8]) -> Result<Vec<u8>, StegoError>;
}

/// Default cipher: AES-256-GCM-SIV with the versioned token format above.
pub struct GcmSivCipher;

impl AuthenticatedCipher for GcmSivCipher {
    fn encrypt(&self, key: &[u8; KEY_LEN], plaintext: &[u8]) -> Vec<u8> {
        use rand::RngCore;
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);

        let cipher = Aes256GcmSiv::new_from_slice(key).expect("valid key length");
        let nonce = Nonce::from_slice(&nonce_bytes);
        let sealed = cipher
            .encrypt(nonce, Payload { msg: plaintext, aad: &[TOKEN_VERSION] })
            .expect("AES-GCM-SIV encrypt should not fail");

        let mut token = Vec::with_capacity(1 + NONCE_LEN + sealed.len());
        token.push(TOKEN_VERSION);
        token.extend_from_slice(&nonce_bytes);
        token.extend_from_slice(&sealed);
        token
    }

    fn decrypt(&self, key: &[u8; KEY_LEN], token: &[u8]) -> Result<Vec<u8>, StegoError> {
        if token.len() < TOKEN_OVERHEAD || token[0] != TOKEN_VERSION {
            return Err(StegoError::AuthenticationFailed);
        }

        let cipher = Aes256GcmSiv::new_from_slice(key).expect("valid key length");
        let nonce = Nonce::from_slice(&token[1..1 + NONCE_LEN]);
        cipher
            .decrypt(nonce, Payload {
                msg: &token[1 + NONCE_LEN..],
                aad: &[TOKEN_VERSION],
            })
            .map_err(|_| StegoError::AuthenticationFailed)
    }
}
