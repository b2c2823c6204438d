// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Main vault subcommands: `list`, `add`, `remove`, `generate` and `strength`.

use secrecy::SecretString;
use strongbox_core::{CredentialRecord, StrongboxError, DEFAULT_CATEGORY};
use strongbox_vault::{estimate_strength, generate_password, mask_secret, CredentialBook, VaultStore};

use crate::output::Output;

/// Fields for a new credential.
#[derive(Debug, Clone, Default)]
pub struct NewCredential {
    pub service: String,
    pub username: String,
    pub category: Option<String>,
    pub notes: Option<String>,
    /// Generated with `length` characters when absent.
    pub password: Option<String>,
    pub length: usize,
}

/// One display line per record; passwords are masked.
pub fn format_record(id: &str, record: &CredentialRecord) -> String {
    format!(
        "{id}  [{}] {} / {} / {}",
        record.category,
        record.service,
        record.username,
        mask_secret(&record.password)
    )
}

/// `strongbox list [QUERY]`
pub async fn run_list(
    store: &VaultStore,
    password: &SecretString,
    query: Option<&str>,
    out: Output,
) -> Result<(), StrongboxError> {
    let book: CredentialBook = store.load(password).await?;
    let matches = book.search(query.unwrap_or_default());
    for (id, record) in &matches {
        out.line(format_record(id, record));
    }
    out.success(format!("{} of {} credential(s)", matches.len(), book.len()));
    Ok(())
}

/// `strongbox add`: returns the new record id.
pub async fn run_add(
    store: &VaultStore,
    password: &SecretString,
    new: NewCredential,
    out: Output,
) -> Result<String, StrongboxError> {
    let mut book: CredentialBook = store.load(password).await?;

    let secret = match new.password {
        Some(value) => value,
        None => generate_password(new.length)?,
    };
    let strength = estimate_strength(&secret);
    let id = book.insert(CredentialRecord {
        category: new
            .category
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        service: new.service,
        username: new.username,
        password: secret,
        notes: new.notes.unwrap_or_default(),
    });

    store.save(&book, password).await?;
    out.line(&id);
    out.success(format!("credential added (strength: {})", strength.label()));
    if let Some(warning) = strength.warning {
        out.warn(warning);
    }
    Ok(id)
}

/// `strongbox remove <ID>`
pub async fn run_remove(
    store: &VaultStore,
    password: &SecretString,
    id: &str,
    out: Output,
) -> Result<(), StrongboxError> {
    let mut book: CredentialBook = store.load(password).await?;
    let Some(removed) = book.remove(id) else {
        return Err(StrongboxError::InvalidInput(format!("no credential with id {id}")));
    };
    store.save(&book, password).await?;
    out.success(format!("removed {} / {}", removed.service, removed.username));
    Ok(())
}

/// `strongbox generate [--length N]`
pub fn run_generate(length: usize, out: Output) -> Result<(), StrongboxError> {
    out.line(generate_password(length)?);
    Ok(())
}

/// `strongbox strength <VALUE>`
pub fn run_strength(value: &str, out: Output) {
    let estimate = estimate_strength(value);
    out.line(format!("score {}/4 ({})", estimate.score, estimate.label()));
    if let Some(warning) = &estimate.warning {
        out.warn(warning);
    }
    for suggestion in &estimate.suggestions {
        out.line(format!("  - {suggestion}"));
    }
}
