// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM encrypt/decrypt with a detached tag.
//!
//! The vault file stores the tag after the ciphertext, so both directions
//! work with `(ciphertext, tag)` pairs rather than ring's appended-tag buffers.
//! Nonces are generated by the caller; a nonce must never be reused under the
//! same key, which holds because every save derives a new key from a new salt.

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};
use strongbox_core::StrongboxError;
use zeroize::Zeroizing;

use crate::kdf::KEY_LEN;

/// Nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// Authentication tag length in bytes (128 bits).
pub const TAG_LEN: usize = 16;

fn cipher(key: &[u8; KEY_LEN]) -> Result<LessSafeKey, StrongboxError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| StrongboxError::Internal("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext`, returning the ciphertext (same length) and the tag.
pub fn encrypt(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; TAG_LEN]), StrongboxError> {
    let mut in_out = plaintext.to_vec();
    let tag = cipher(key)?
        .seal_in_place_separate_tag(
            Nonce::assume_unique_for_key(*nonce),
            Aad::empty(),
            &mut in_out,
        )
        .map_err(|_| StrongboxError::Internal("AES-256-GCM encryption failed".to_string()))?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(tag.as_ref());
    Ok((in_out, tag_bytes))
}

/// Decrypt `ciphertext` and verify `tag`.
///
/// A tag mismatch is reported as [`StrongboxError::Authentication`] and
/// nothing else: it is the only signal for "wrong master password".
pub fn decrypt(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
) -> Result<Zeroizing<Vec<u8>>, StrongboxError> {
    let mut in_out = Zeroizing::new(Vec::with_capacity(ciphertext.len() + TAG_LEN));
    in_out.extend_from_slice(ciphertext);
    in_out.extend_from_slice(tag);

    let plaintext_len = cipher(key)?
        .open_in_place(
            Nonce::assume_unique_for_key(*nonce),
            Aad::empty(),
            in_out.as_mut_slice(),
        )
        .map_err(|_| StrongboxError::Authentication)?
        .len();

    in_out.truncate(plaintext_len);
    Ok(in_out)
}

/// Generate a random 96-bit nonce from the system CSPRNG.
pub fn generate_nonce() -> Result<[u8; NONCE_LEN], StrongboxError> {
    let mut nonce = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce)
        .map_err(|_| StrongboxError::Internal("failed to generate random nonce".to_string()))?;
    Ok(nonce)
}
