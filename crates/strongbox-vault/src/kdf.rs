// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from a master password.
//!
//! The work factor is a fixed build constant, not a per-vault parameter: every
//! vault written by one build can be opened by every other.

use std::num::NonZeroU32;

use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use strongbox_core::StrongboxError;
use zeroize::Zeroizing;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 390_000;

/// A derived vault key, zeroed on drop.
pub type VaultKey = Zeroizing<[u8; KEY_LEN]>;

/// Derive a 32-byte key from `password` and a 16-byte `salt`.
///
/// Fails with [`StrongboxError::InvalidInput`] when the salt is not exactly
/// [`SALT_LEN`] bytes or the password is empty.
pub fn derive_key(password: &[u8], salt: &[u8]) -> Result<VaultKey, StrongboxError> {
    if salt.len() != SALT_LEN {
        return Err(StrongboxError::InvalidInput(format!(
            "salt must be {SALT_LEN} bytes, got {}",
            salt.len()
        )));
    }
    if password.is_empty() {
        return Err(StrongboxError::InvalidInput(
            "master password must not be empty".to_string(),
        ));
    }

    let iterations = NonZeroU32::new(PBKDF2_ITERATIONS)
        .ok_or_else(|| StrongboxError::Internal("PBKDF2 iteration count is zero".to_string()))?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        password,
        key.as_mut(),
    );
    Ok(key)
}

/// Generate a fresh random salt from the system CSPRNG.
pub fn generate_salt() -> Result<[u8; SALT_LEN], StrongboxError> {
    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| StrongboxError::Internal("failed to generate random salt".to_string()))?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_key_matches_reference_vector() {
        let salt: Vec<u8> = (0u8..16).collect();
        let key = derive_key(b"correct horse battery staple", &salt).unwrap();
        assert_eq!(
            hex::encode(*key),
            "8612040a9fe3f47ffddfda6f3d3b9ecea35aa01e4c21045c296b92da7976373c"
        );
    }

    #[test]
    fn derive_key_different_salt_produces_different_output() {
        let key1 = derive_key(b"same password", &[1u8; 16]).unwrap();
        let key2 = derive_key(b"same password", &[2u8; 16]).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn derive_key_rejects_wrong_salt_length() {
        let err = derive_key(b"pw", &[0u8; 15]).unwrap_err();
        assert!(matches!(err, StrongboxError::InvalidInput(_)));
        let err = derive_key(b"pw", &[0u8; 32]).unwrap_err();
        assert!(matches!(err, StrongboxError::InvalidInput(_)));
    }

    #[test]
    fn derive_key_rejects_empty_password() {
        let err = derive_key(b"", &[0u8; 16]).unwrap_err();
        assert!(matches!(err, StrongboxError::InvalidInput(msg) if msg.contains("empty")));
    }

    #[test]
    fn generate_salt_produces_random_values() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }
}
