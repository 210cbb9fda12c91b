// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! LanguageTool checker client.
//!
//! Wire types for the `/v2/check` endpoint, the `Checker` seam the language
//! server calls through, and an HTTP implementation of it. The server never
//! talks to `reqwest` directly, so tests can swap in a canned checker.

pub mod client;
pub mod error;

use async_trait::async_trait;
use serde::Deserialize;

pub use client::{Credentials, LanguageToolClient, DEFAULT_URL, PREMIUM_URL};
pub use error::CheckError;

// ============================================================================
// Checker seam
// ============================================================================

/// Anything that can grammar-check a text.
#[async_trait]
pub trait Checker: Send + Sync {
    /// Check `text` and return the service's findings.
    ///
    /// `language` is a LanguageTool language code such as `en-US`, or
    /// `auto` to let the service detect it.
    async fn check_text(&self, text: &str, language: &str) -> Result<CheckResult, CheckError>;
}

// ============================================================================
// Wire types
// ============================================================================

/// Response body of `POST /v2/check`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CheckResult {
    pub software: Software,
    pub language: Option<DetectedLanguage>,
    pub matches: Vec<Match>,
}

/// Information about the server that answered.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Software {
    pub name: String,
    pub version: String,
    /// Whether the request was served with premium credentials.
    pub premium: bool,
}

/// Language the text was checked as.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectedLanguage {
    pub name: String,
    pub code: String,
}

/// A single finding.
///
/// `offset` and `length` count UTF-16 code units from the start of the
/// checked text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Match {
    pub message: String,
    pub short_message: String,
    pub offset: usize,
    pub length: usize,
    /// Suggested fixes, most likely first.
    pub replacements: Vec<Replacement>,
    pub context: MatchContext,
    pub sentence: String,
    pub rule: Option<Rule>,
}

impl Match {
    /// Replacement values in service order.
    pub fn replacement_values(&self) -> Vec<String> {
        self.replacements.iter().map(|r| r.value.clone()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Replacement {
    pub value: String,
}

/// Excerpt around a match, with the match's position inside the excerpt.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchContext {
    pub text: String,
    pub offset: usize,
    pub length: usize,
}

/// The rule that produced a match.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub description: String,
    /// Localization Quality Issue Type, e.g. `misspelling` or `grammar`.
    pub issue_type: String,
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: String,
    pub name: String,
}
