// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal output with optional color.

use colored::Colorize;

/// Writes status lines to stderr and results to stdout.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    color: bool,
}

impl Output {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// A result line on stdout.
    pub fn line(&self, text: impl AsRef<str>) {
        println!("{}", text.as_ref());
    }

    pub fn success(&self, text: impl AsRef<str>) {
        if self.color {
            eprintln!("  {} {}", "✓".green(), text.as_ref());
        } else {
            eprintln!("  [OK]   {}", text.as_ref());
        }
    }

    pub fn warn(&self, text: impl AsRef<str>) {
        if self.color {
            eprintln!("  {} {}", "!".yellow(), text.as_ref().yellow());
        } else {
            eprintln!("  [WARN] {}", text.as_ref());
        }
    }

    pub fn error(&self, text: impl AsRef<str>) {
        if self.color {
            eprintln!("  {} {}", "✗".red(), text.as_ref().red());
        } else {
            eprintln!("  [FAIL] {}", text.as_ref());
        }
    }

    pub fn warnings(&self, warnings: &[String]) {
        for warning in warnings {
            self.warn(warning);
        }
    }
}
