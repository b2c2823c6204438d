// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password strength estimation backed by zxcvbn.

use serde::Serialize;

/// Score and human feedback for one password.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StrengthEstimate {
    /// 0 (trivially guessable) to 4 (very strong).
    pub score: u8,
    pub warning: Option<String>,
    pub suggestions: Vec<String>,
}

impl StrengthEstimate {
    /// Short label for the score.
    pub fn label(&self) -> &'static str {
        match self.score {
            0 => "very weak",
            1 => "weak",
            2 => "fair",
            3 => "strong",
            _ => "very strong",
        }
    }
}

/// Estimate how hard `password` is to guess. Pure function of its input.
pub fn estimate_strength(password: &str) -> StrengthEstimate {
    let Ok(entropy) = zxcvbn::zxcvbn(password, &[]) else {
        // Only a blank password is rejected.
        return StrengthEstimate::default();
    };

    let (warning, suggestions) = match entropy.feedback() {
        Some(feedback) => (
            feedback.warning().map(|w| w.to_string()),
            feedback.suggestions().iter().map(ToString::to_string).collect(),
        ),
        None => (None, Vec::new()),
    };

    StrengthEstimate {
        score: entropy.score().min(4),
        warning,
        suggestions,
    }
}
