// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Server configuration.
//!
//! Read from a TOML file (default `~/.lt-lsp.toml`), then overridden by
//! `LT_LSP_*` environment variables. A missing file is not an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lt_check::{Credentials, LanguageToolClient, DEFAULT_URL};

const CONFIG_FILE: &str = ".lt-lsp.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("cannot determine config location: set LT_LSP_CONFIG or HOME")]
    NoHome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API root, e.g. `https://api.languagetoolplus.com/v2`.
    pub url: String,
    pub username: String,
    pub api_key: String,
    /// Language code passed to every check; `auto` detects it.
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            url: DEFAULT_URL.to_string(),
            username: String::new(),
            api_key: String::new(),
            language: "auto".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Where the config file lives when no path is given.
    ///
    /// `LT_LSP_CONFIG`, else `$HOME/.lt-lsp.toml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = std::env::var("LT_LSP_CONFIG") {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        home_dir()
            .map(|home| home.join(CONFIG_FILE))
            .ok_or(ConfigError::NoHome)
    }

    /// Load from `path` (defaults if absent) and apply env overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read the file only. Missing file → defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override fields from `LT_LSP_URL`, `LT_LSP_USERNAME`,
    /// `LT_LSP_API_KEY` and `LT_LSP_LANGUAGE`. Empty values are ignored.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let fields: [(&str, &mut String); 4] = [
            ("LT_LSP_URL", &mut self.url),
            ("LT_LSP_USERNAME", &mut self.username),
            ("LT_LSP_API_KEY", &mut self.api_key),
            ("LT_LSP_LANGUAGE", &mut self.language),
        ];
        for (key, field) in fields {
            if let Some(value) = var(key).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }
    }

    /// Write as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, content).map_err(io_err)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.api_key.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// HTTP checker for this configuration.
    pub fn client(&self) -> LanguageToolClient {
        LanguageToolClient::new(&self.url).with_credentials(self.credentials())
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.language, "auto");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "language = \"de-DE\"\ntimeout_secs = 5\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.language, "de-DE");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.url, DEFAULT_URL);
        assert!(!config.credentials().is_complete());
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            username: "me@example.com".to_string(),
            api_key: "secret".to_string(),
            url: "https://api.languagetoolplus.com/v2".to_string(),
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.credentials().is_complete());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("LT_LSP_URL", "http://localhost:8081/v2"),
            ("LT_LSP_LANGUAGE", "en-GB"),
            ("LT_LSP_USERNAME", ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config {
            username: "kept".to_string(),
            ..Default::default()
        };
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.url, "http://localhost:8081/v2");
        assert_eq!(config.language, "en-GB");
        assert_eq!(config.username, "kept");
        assert_eq!(config.client().base_url(), "http://localhost:8081/v2");
    }
}
