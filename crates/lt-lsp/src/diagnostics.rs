// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Checker matches to LSP diagnostics, and publishing them.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::*;
use tower_lsp::Client;
use tracing::{debug, warn};

use lt_check::{CheckError, Checker, Match};

use crate::convert::{offset_to_range, split_lines};

/// Value of `Diagnostic::source` for everything this server reports.
pub const SOURCE: &str = "languagetool";

/// Payload stored in `Diagnostic::data`.
///
/// Editors echo diagnostics back on code action requests, so the
/// replacements travel with the diagnostic instead of being kept here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementData {
    pub replacements: Vec<String>,
}

/// Convert one checker match into an LSP diagnostic.
pub fn to_lsp_diagnostic(lines: &[&str], m: &Match) -> Diagnostic {
    let range = offset_to_range(lines, m.offset, m.length);

    let severity = Some(match m.rule.as_ref().map(|r| r.issue_type.as_str()) {
        Some("misspelling") => DiagnosticSeverity::ERROR,
        Some("grammar") | Some("typographical") | None => DiagnosticSeverity::WARNING,
        Some(_) => DiagnosticSeverity::INFORMATION,
    });

    let code = m
        .rule
        .as_ref()
        .filter(|r| !r.id.is_empty())
        .map(|r| NumberOrString::String(r.id.clone()));

    let data = ReplacementData {
        replacements: m.replacement_values(),
    };

    Diagnostic {
        range,
        severity,
        code,
        code_description: None,
        source: Some(SOURCE.to_string()),
        message: m.message.clone(),
        related_information: None,
        tags: None,
        data: serde_json::to_value(data).ok(),
    }
}

/// Convert a whole match list, one diagnostic per match, in order.
pub fn build_diagnostics(text: &str, matches: &[Match]) -> Vec<Diagnostic> {
    let lines = split_lines(text);
    matches.iter().map(|m| to_lsp_diagnostic(&lines, m)).collect()
}

// ============================================================================
// Publishing
// ============================================================================

/// Where diagnostics go once built.
#[tower_lsp::async_trait]
pub trait DiagnosticSink: Send + Sync {
    /// Replace every diagnostic previously published for `uri`.
    ///
    /// `version` is the document version the diagnostics were computed for.
    async fn publish(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>);
}

#[tower_lsp::async_trait]
impl DiagnosticSink for Client {
    async fn publish(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>) {
        self.publish_diagnostics(uri, diagnostics, version).await;
    }
}

/// Runs the checker over a document and publishes the result.
pub struct DiagnosticPublisher<S> {
    checker: Arc<dyn Checker>,
    sink: S,
    language: String,
    timeout: Duration,
}

impl<S: DiagnosticSink> DiagnosticPublisher<S> {
    pub fn new(checker: Arc<dyn Checker>, sink: S, language: &str, timeout: Duration) -> Self {
        Self {
            checker,
            sink,
            language: language.to_string(),
            timeout,
        }
    }

    #[cfg(test)]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Check `text` and publish its diagnostics for `uri`.
    ///
    /// The publication is tagged with `version` so an editor can drop a
    /// set that arrives after a newer edit.
    ///
    /// Returns the number of diagnostics published. On error nothing is
    /// published, so the editor keeps showing the last good set.
    pub async fn refresh(
        &self,
        uri: Url,
        text: &str,
        version: Option<i32>,
    ) -> Result<usize, CheckError> {
        let check = self.checker.check_text(text, &self.language);
        let result = match tokio::time::timeout(self.timeout, check).await {
            Ok(result) => result,
            Err(_) => Err(CheckError::Timeout(self.timeout)),
        };
        let result = result.inspect_err(|e| warn!(%uri, error = %e, "check failed"))?;

        let diagnostics = build_diagnostics(text, &result.matches);
        let count = diagnostics.len();
        debug!(%uri, count, ?version, "publishing diagnostics");
        self.sink.publish(uri, diagnostics, version).await;
        Ok(count)
    }
}
