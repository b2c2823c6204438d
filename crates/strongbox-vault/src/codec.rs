// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault file framing and payload encoding.
//!
//! Layout: `salt(16) || nonce(12) || ciphertext(N) || tag(16)`. Offsets are
//! fixed; the ciphertext is exactly as long as the serialized payload.

use serde::de::DeserializeOwned;
use serde::Serialize;
use strongbox_core::StrongboxError;
use zeroize::Zeroizing;

use crate::crypto::{self, NONCE_LEN, TAG_LEN};
use crate::kdf::{self, SALT_LEN};

/// Size of the fixed header plus trailing tag; the smallest valid vault file.
pub const MIN_FRAME_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// One parsed vault file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultFrame {
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

impl VaultFrame {
    /// Split raw file bytes by the fixed offsets.
    pub fn parse(bytes: &[u8]) -> Result<Self, StrongboxError> {
        if bytes.len() < MIN_FRAME_LEN {
            return Err(StrongboxError::CorruptData(format!(
                "vault file is {} bytes, shorter than the {MIN_FRAME_LEN}-byte minimum",
                bytes.len()
            )));
        }

        let (salt, rest) = bytes.split_at(SALT_LEN);
        let (nonce, rest) = rest.split_at(NONCE_LEN);
        let (ciphertext, tag) = rest.split_at(rest.len() - TAG_LEN);

        Ok(Self {
            salt: to_array(salt)?,
            nonce: to_array(nonce)?,
            ciphertext: ciphertext.to_vec(),
            tag: to_array(tag)?,
        })
    }

    /// Concatenate the frame back into file bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(MIN_FRAME_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.salt);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out.extend_from_slice(&self.tag);
        out
    }
}

fn to_array<const N: usize>(slice: &[u8]) -> Result<[u8; N], StrongboxError> {
    slice
        .try_into()
        .map_err(|_| StrongboxError::CorruptData(format!("expected {N} header bytes")))
}

/// Encrypt `plaintext` under a key derived from `password` and a fresh salt and nonce.
pub fn seal(password: &[u8], plaintext: &[u8]) -> Result<VaultFrame, StrongboxError> {
    let salt = kdf::generate_salt()?;
    let nonce = crypto::generate_nonce()?;
    let key = kdf::derive_key(password, &salt)?;
    let (ciphertext, tag) = crypto::encrypt(&key, &nonce, plaintext)?;
    Ok(VaultFrame {
        salt,
        nonce,
        ciphertext,
        tag,
    })
}

/// Derive the key from the frame's salt and decrypt it.
pub fn open(password: &[u8], frame: &VaultFrame) -> Result<Zeroizing<Vec<u8>>, StrongboxError> {
    let key = kdf::derive_key(password, &frame.salt)?;
    crypto::decrypt(&key, &frame.nonce, &frame.ciphertext, &frame.tag)
}

/// Serialize a payload to its canonical byte encoding (JSON).
pub fn encode_payload<T: Serialize + ?Sized>(data: &T) -> Result<Zeroizing<Vec<u8>>, StrongboxError> {
    serde_json::to_vec_pretty(data)
        .map(Zeroizing::new)
        .map_err(|e| StrongboxError::Internal(format!("failed to serialize vault payload: {e}")))
}

/// Deserialize a decrypted payload.
///
/// Decryption already succeeded, so a failure here means the payload is not
/// the expected structure: [`StrongboxError::CorruptData`].
pub fn decode_payload<T: DeserializeOwned>(plaintext: &[u8]) -> Result<T, StrongboxError> {
    serde_json::from_slice(plaintext).map_err(|e| {
        StrongboxError::CorruptData(format!("decrypted payload is not valid vault data: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn frame_offsets_are_fixed() {
        let bytes: Vec<u8> = (0u8..60).collect();
        let frame = VaultFrame::parse(&bytes).unwrap();
        assert_eq!(frame.salt[0], 0);
        assert_eq!(frame.nonce[0], 16);
        assert_eq!(frame.ciphertext.first(), Some(&28));
        assert_eq!(frame.ciphertext.len(), 60 - MIN_FRAME_LEN);
        assert_eq!(frame.tag[0], 44);
        assert_eq!(frame.to_bytes(), bytes);
    }

    #[test]
    fn minimum_frame_has_empty_ciphertext() {
        let frame = VaultFrame::parse(&[0u8; MIN_FRAME_LEN]).unwrap();
        assert!(frame.ciphertext.is_empty());
    }

    #[test]
    fn short_frame_is_corrupt() {
        let err = VaultFrame::parse(&[0u8; MIN_FRAME_LEN - 1]).unwrap_err();
        assert!(matches!(err, StrongboxError::CorruptData(_)));
    }

    #[test]
    fn seal_open_roundtrip_with_fresh_salt() {
        let first = seal(b"pw", b"payload").unwrap();
        let second = seal(b"pw", b"payload").unwrap();
        assert_ne!(first.salt, second.salt);
        assert_eq!(first.ciphertext.len(), b"payload".len());
        assert_eq!(open(b"pw", &first).unwrap().as_slice(), b"payload");
    }

    #[test]
    fn open_with_wrong_password_is_authentication_error() {
        let frame = seal(b"right", b"payload").unwrap();
        assert!(open(b"wrong", &frame).unwrap_err().is_authentication());
    }

    #[test]
    fn decode_of_foreign_payload_is_corrupt() {
        let err = decode_payload::<BTreeMap<String, String>>(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, StrongboxError::CorruptData(_)));
    }
}
