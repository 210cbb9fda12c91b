// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! LanguageTool Language Server
//!
//! Sends each document to a LanguageTool server on open and on every
//! change, and reports the findings as diagnostics.
//!
//! Also provides:
//! - Code Actions (replace a finding with one of its suggestions)
//! - `configure` to store premium API credentials

mod backend;
mod code_actions;
mod config;
mod convert;
mod diagnostics;
mod server;

use std::env;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tower_lsp::{LspService, Server};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lt_check::{CheckError, Checker, DEFAULT_URL, PREMIUM_URL};

use crate::backend::Backend;
use crate::config::Config;

/// Text used to verify credentials.
const SAMPLE_TEXT: &str =
    "Lorem ipsum dolor sit amet, qui minim labore adipisicing minim sint cillum sint consectetur cupidatat.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Run,
    Configure { username: String, api_key: String },
    Help,
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Options {
    command: Command,
    config: Option<PathBuf>,
    log_file: Option<PathBuf>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Options, String> {
        let mut config = None;
        let mut log_file = None;
        let mut positional = Vec::new();

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" => {
                    let path = iter.next().ok_or("--config requires a path")?;
                    config = Some(PathBuf::from(path));
                }
                "--log-file" => {
                    let path = iter.next().ok_or("--log-file requires a path")?;
                    log_file = Some(PathBuf::from(path));
                }
                _ => positional.push(arg.as_str()),
            }
        }

        let command = match positional.as_slice() {
            [] | ["run"] => Command::Run,
            ["configure", username, api_key] => Command::Configure {
                username: username.to_string(),
                api_key: api_key.to_string(),
            },
            ["configure", ..] => {
                return Err("Usage: lt-lsp configure <username> <api-token>".to_string())
            }
            ["help" | "--help" | "-h", ..] => Command::Help,
            ["version" | "--version" | "-V", ..] => Command::Version,
            [other, ..] => return Err(format!("Unknown command: {}", other)),
        };

        Ok(Options {
            command,
            config,
            log_file,
        })
    }
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = match Options::parse(&args) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("{}", msg);
            print_usage();
            process::exit(1);
        }
    };

    match options.command {
        Command::Help => {
            print_usage();
            return;
        }
        Command::Version => {
            println!("lt-lsp {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        _ => {}
    }

    if let Err(e) = init_logging(options.log_file.as_deref()) {
        eprintln!("Error opening log file: {}", e);
        process::exit(1);
    }

    let config_path = match options.config.clone().map_or_else(Config::default_path, Ok) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match options.command {
        Command::Configure { username, api_key } => {
            cmd_configure(&config_path, &username, &api_key).await
        }
        _ => cmd_run(&config_path).await,
    }
}

fn print_usage() {
    println!("lt-lsp {} - a language server for LanguageTool", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: lt-lsp [options] [command]");
    println!();
    println!("Commands:");
    println!("  run                              Serve LSP on stdio (default)");
    println!("  configure <username> <api-token> Verify and store premium credentials");
    println!("  help                             Show this help");
    println!("  version                          Show version");
    println!();
    println!("Options:");
    println!("  --config <path>    Config file (default: $LT_LSP_CONFIG or ~/.lt-lsp.toml)");
    println!("  --log-file <path>  Append logs to a file instead of stderr");
    println!();
    println!("Log level is read from LT_LSP_LOG (default: info).");
}

/// Logs go to stderr or a file; stdout carries the protocol.
fn init_logging(log_file: Option<&Path>) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_env("LT_LSP_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

async fn cmd_run(config_path: &Path) {
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    info!(
        url = %config.url,
        language = %config.language,
        premium = config.credentials().is_complete(),
        "starting"
    );

    let checker: Arc<dyn Checker> = Arc::new(config.client());

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| Backend::new(client, checker, &config));
    Server::new(stdin, stdout, socket).serve(service).await;
    info!("connection closed");
}

async fn cmd_configure(config_path: &Path, username: &str, api_key: &str) {
    let mut config = match Config::from_file(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    config.username = username.to_string();
    config.api_key = api_key.to_string();
    // Premium accounts are only served by the paid endpoint.
    if config.url == DEFAULT_URL {
        config.url = PREMIUM_URL.to_string();
    }

    if let Err(e) = verify_credentials(&config.client(), config.timeout()).await {
        eprintln!("Error: {}: {}", config.url, e);
        process::exit(1);
    }

    if let Err(e) = config.save(config_path) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
    println!("Credentials saved to {}", config_path.display());
}

#[derive(Debug, Error)]
enum VerifyError {
    #[error("could not verify credentials: {0}")]
    Check(#[from] CheckError),
    #[error("credentials were not accepted as premium")]
    NotPremium,
}

/// Run one check with the configured credentials and require a premium answer.
async fn verify_credentials(checker: &dyn Checker, timeout: Duration) -> Result<(), VerifyError> {
    let result = tokio::time::timeout(timeout, checker.check_text(SAMPLE_TEXT, "auto"))
        .await
        .map_err(|_| CheckError::Timeout(timeout))??;
    if !result.software.premium {
        return Err(VerifyError::NotPremium);
    }
    Ok(())
}
