// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random passwords, record ids, and display masking.

use rand::rngs::OsRng;
use rand::Rng;
use strongbox_core::StrongboxError;

/// Shortest password [`generate_password`] will produce.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Draws rejected before generation gives up.
pub const MAX_GENERATION_ATTEMPTS: usize = 100;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,./?";

/// Generate a password of `length` characters (at least [`MIN_PASSWORD_LENGTH`])
/// containing one or more lowercase, uppercase, digit and symbol characters.
pub fn generate_password(length: usize) -> Result<String, StrongboxError> {
    generate_password_with(&mut OsRng, length)
}

/// [`generate_password`] over a caller-supplied random source.
///
/// Each attempt samples every character uniformly from the full alphabet and
/// is discarded unless all four classes appear.
pub fn generate_password_with<R: Rng>(rng: &mut R, length: usize) -> Result<String, StrongboxError> {
    let length = length.max(MIN_PASSWORD_LENGTH);
    let alphabet: Vec<u8> = [LOWERCASE, UPPERCASE, DIGITS, SYMBOLS].concat();

    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let candidate: String = (0..length)
            .map(|_| char::from(alphabet[rng.gen_range(0..alphabet.len())]))
            .collect();
        if has_every_class(&candidate) {
            return Ok(candidate);
        }
    }

    Err(StrongboxError::Generation(format!(
        "no password of length {length} met the complexity policy after {MAX_GENERATION_ATTEMPTS} attempts"
    )))
}

/// True when `password` has at least one character from each class.
pub fn has_every_class(password: &str) -> bool {
    let bytes = password.as_bytes();
    [LOWERCASE, UPPERCASE, DIGITS, SYMBOLS]
        .iter()
        .all(|class| bytes.iter().any(|b| class.contains(b)))
}

/// A new globally unique record id.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Mask a secret for display: `"hunt...ter2"` style.
///
/// Values shorter than 10 characters are fully masked as `"****"`.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::rngs::mock::StepRng;

    use super::*;

    proptest! {
        #[test]
        fn generated_passwords_have_every_class(length in 8usize..64) {
            let password = generate_password(length).unwrap();
            prop_assert_eq!(password.chars().count(), length);
            prop_assert!(has_every_class(&password));
        }
    }

    #[test]
    fn short_lengths_are_raised_to_minimum() {
        assert_eq!(generate_password(0).unwrap().len(), MIN_PASSWORD_LENGTH);
        assert_eq!(generate_password(5).unwrap().len(), MIN_PASSWORD_LENGTH);
    }

    #[test]
    fn degenerate_rng_exhausts_retry_budget() {
        // A constant source always picks the same character, so no draw can pass.
        let mut rng = StepRng::new(0, 0);
        let err = generate_password_with(&mut rng, 16).unwrap_err();
        assert!(matches!(err, StrongboxError::Generation(_)));
    }

    #[test]
    fn class_check_requires_all_four() {
        assert!(has_every_class("aA1!"));
        assert!(!has_every_class("aA1a"));
        assert!(!has_every_class("AA1!"));
        assert!(!has_every_class(""));
    }

    #[test]
    fn ids_are_unique_uuids() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn mask_secret_long_value() {
        assert_eq!(mask_secret("correct-horse-battery"), "corr...tery");
    }

    #[test]
    fn mask_secret_short_value() {
        assert_eq!(mask_secret("short"), "****");
    }

    #[test]
    fn mask_secret_exact_boundary() {
        assert_eq!(mask_secret("1234567890"), "1234...7890");
    }

    #[test]
    fn mask_secret_handles_multibyte_chars() {
        assert_eq!(mask_secret("ünïcödé-pässwörd"), "ünïc...wörd");
    }
}
