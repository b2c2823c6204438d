// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master password acquisition via TTY prompt or STRONGBOX_MASTER_PASSWORD.

use secrecy::SecretString;
use strongbox_core::StrongboxError;

/// Environment variable read before falling back to an interactive prompt.
pub const MASTER_PASSWORD_ENV_VAR: &str = "STRONGBOX_MASTER_PASSWORD";

const NO_PASSWORD: &str =
    "no master password provided; set STRONGBOX_MASTER_PASSWORD or run interactively";

fn from_env() -> Option<SecretString> {
    std::env::var(MASTER_PASSWORD_ENV_VAR)
        .ok()
        .filter(|value| !value.is_empty())
        .map(SecretString::from)
}

fn read_hidden(label: &str) -> Result<String, StrongboxError> {
    eprint!("{label}: ");
    rpassword::read_password().map_err(|e| StrongboxError::io("failed to read master password", e))
}

fn stdin_is_terminal() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdin())
}

/// Get the master password for unlocking an existing vault.
///
/// The environment variable wins; otherwise a hidden prompt is shown when
/// stdin is a terminal.
pub fn master_password() -> Result<SecretString, StrongboxError> {
    if let Some(password) = from_env() {
        return Ok(password);
    }

    if stdin_is_terminal() {
        let password = read_hidden("Master password")?;
        if password.is_empty() {
            return Err(StrongboxError::InvalidInput(
                "empty master password not allowed".to_string(),
            ));
        }
        return Ok(SecretString::from(password));
    }

    Err(StrongboxError::InvalidInput(NO_PASSWORD.to_string()))
}

/// Get a new master password, prompting twice on a terminal.
pub fn master_password_with_confirm() -> Result<SecretString, StrongboxError> {
    if let Some(password) = from_env() {
        return Ok(password);
    }

    if stdin_is_terminal() {
        let first = zeroize::Zeroizing::new(read_hidden("New master password")?);
        let second = zeroize::Zeroizing::new(read_hidden("Confirm master password")?);

        if *first != *second {
            return Err(StrongboxError::InvalidInput(
                "master passwords do not match".to_string(),
            ));
        }
        if first.is_empty() {
            return Err(StrongboxError::InvalidInput(
                "empty master password not allowed".to_string(),
            ));
        }
        return Ok(SecretString::from(first.to_string()));
    }

    Err(StrongboxError::InvalidInput(NO_PASSWORD.to_string()))
}
