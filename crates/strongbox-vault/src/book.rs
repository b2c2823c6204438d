// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The main vault payload: credential records keyed by opaque id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strongbox_core::{CredentialRecord, StrongboxError};

use crate::generator::generate_id;

/// All stored credentials. Persisted as a whole; the id lives only in the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialBook {
    records: BTreeMap<String, CredentialRecord>,
}

impl CredentialBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `record` under a freshly generated id and return the id.
    pub fn insert(&mut self, record: CredentialRecord) -> String {
        let id = generate_id();
        self.records.insert(id.clone(), record);
        id
    }

    /// Replace the record stored under `id`.
    pub fn update(&mut self, id: &str, record: CredentialRecord) -> Result<(), StrongboxError> {
        match self.records.get_mut(id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(StrongboxError::InvalidInput(format!("no credential with id {id}"))),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<CredentialRecord> {
        self.records.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&CredentialRecord> {
        self.records.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CredentialRecord)> {
        self.records.iter().map(|(id, record)| (id.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose service, username or category contains `query`, ignoring case.
    /// An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<(&str, &CredentialRecord)> {
        let needle = query.trim().to_lowercase();
        self.iter()
            .filter(|(_, record)| {
                needle.is_empty()
                    || [&record.service, &record.username, &record.category]
                        .iter()
                        .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }
}
