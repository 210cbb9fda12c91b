// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Core backend struct and check pipeline.

use std::sync::Arc;

use tower_lsp::lsp_types::*;
use tower_lsp::Client;
use tracing::{debug, error};

use lt_check::Checker;

use crate::config::Config;
use crate::diagnostics::DiagnosticPublisher;

/// Holds only immutable handles, so concurrent requests need no locking.
pub struct Backend {
    pub client: Client,
    pub publisher: DiagnosticPublisher<Client>,
}

impl Backend {
    pub fn new(client: Client, checker: Arc<dyn Checker>, config: &Config) -> Self {
        let publisher = DiagnosticPublisher::new(
            checker,
            client.clone(),
            &config.language,
            config.timeout(),
        );
        Self { client, publisher }
    }

    /// Check a document at `version` and publish its diagnostics.
    ///
    /// A failed check is reported to the editor's log; the diagnostics it
    /// already shows are left alone.
    pub async fn check_document(&self, uri: Url, text: &str, version: i32) {
        match self.publisher.refresh(uri.clone(), text, Some(version)).await {
            Ok(count) => debug!(%uri, count, "diagnostics published"),
            Err(e) => {
                error!(%uri, error = %e, "LanguageTool check failed");
                self.client
                    .log_message(
                        MessageType::ERROR,
                        format!("LanguageTool check failed for {}: {}", uri, e),
                    )
                    .await;
            }
        }
    }
}
