// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! HTTP client for the LanguageTool check API.
//!
//! POST {url}/check with a form-encoded body; the response is a JSON
//! `CheckResult`. Premium accounts authenticate with a username and API
//! key sent as form fields.

use async_trait::async_trait;
use tracing::debug;

use crate::{CheckError, CheckResult, Checker};

/// Public LanguageTool endpoint.
pub const DEFAULT_URL: &str = "https://api.languagetool.org/v2";

/// Endpoint for premium accounts.
pub const PREMIUM_URL: &str = "https://api.languagetoolplus.com/v2";

/// Premium account credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
        }
    }

    /// Both parts present.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.api_key.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct LanguageToolClient {
    base_url: String,
    http: reqwest::Client,
    credentials: Credentials,
}

impl Default for LanguageToolClient {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

impl LanguageToolClient {
    /// Create a client for the API rooted at `base_url` (e.g. `.../v2`).
    pub fn new(base_url: &str) -> Self {
        LanguageToolClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            credentials: Credentials::default(),
        }
    }

    pub fn with_credentials(self, credentials: Credentials) -> Self {
        LanguageToolClient {
            credentials,
            ..self
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn check_url(&self) -> String {
        format!("{}/check", self.base_url)
    }

    /// Form fields for a check request.
    fn form_fields<'a>(&'a self, text: &'a str, language: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut fields = vec![
            ("text", text),
            ("language", language),
            ("enabledOnly", "false"),
        ];
        // Partial credentials are rejected by the service, so send none.
        if self.credentials.is_complete() {
            fields.push(("username", self.credentials.username.as_str()));
            fields.push(("apiKey", self.credentials.api_key.as_str()));
        }
        fields
    }
}

#[async_trait]
impl Checker for LanguageToolClient {
    async fn check_text(&self, text: &str, language: &str) -> Result<CheckResult, CheckError> {
        let url = self.check_url();
        debug!(%url, len = text.len(), language, "checking text");

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&self.form_fields(text, language))
            .send()
            .await
            .map_err(|e| CheckError::Http(format!("{}: {}", url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckError::Http(format!("reading response: {}", e)))?;

        if !status.is_success() {
            return Err(CheckError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result: CheckResult = serde_json::from_str(&body)
            .map_err(|e| CheckError::Parse(format!("{}: {}", url, e)))?;
        debug!(matches = result.matches.len(), "check finished");
        Ok(result)
    }
}
