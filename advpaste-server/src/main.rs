//! Advanced Paste Server
//!
//! Hosts the plugin for an editor integration over stdio: JSON-RPC 2.0, one
//! request per line on stdin, one response per line on stdout, logs on stderr.
//!
//! Methods:
//! - initialize / initialized / ping: lifecycle (`initialized` releases script loading)
//! - commands/list: registered commands plus pending notices
//! - commands/execute: run a command against the system clipboard
//! - settings/get, settings/set, settings/describe: the settings page
//!
//! Environment:
//! - ADVPASTE_VAULT_PATH: vault root (default: current directory)
//! - ADVPASTE_DATA_PATH: settings file (default: `<vault>/.advpaste/data.json`)
//! - RUST_LOG: log filter (default: `info`)

mod host;
mod rpc;
mod server;

use advpaste::PluginHost;
use host::{CollectingNotifier, FsVault, JsonFileStore, SystemClipboard};
use server::{Server, SERVER_VERSION};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Config {
    vault_path: PathBuf,
    data_path: PathBuf,
}

impl Config {
    fn from_env() -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::resolve(
            env::var("ADVPASTE_VAULT_PATH").ok(),
            env::var("ADVPASTE_DATA_PATH").ok(),
            cwd,
        )
    }

    fn resolve(vault: Option<String>, data: Option<String>, cwd: PathBuf) -> Self {
        let vault_path = vault.filter(|v| !v.is_empty()).map(PathBuf::from).unwrap_or(cwd);
        let data_path = data
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| vault_path.join(".advpaste").join("data.json"));
        Self { vault_path, data_path }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    info!(
        version = SERVER_VERSION,
        vault = %config.vault_path.display(),
        data = %config.data_path.display(),
        "Advanced Paste server started"
    );

    let notices = Arc::new(CollectingNotifier::default());
    let host = PluginHost {
        clipboard: Arc::new(SystemClipboard),
        vault: Arc::new(FsVault::new(&config.vault_path)),
        notifier: notices.clone(),
        store: Arc::new(JsonFileStore::new(&config.data_path)),
    };

    let mut server = match Server::start(host, notices).await {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "failed to load Advanced Paste");
            return ExitCode::FAILURE;
        }
    };

    info!("server ready, waiting for requests");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let result = server.run(stdin, tokio::io::stdout()).await;
    server.shutdown();

    match result {
        Ok(()) => {
            info!("server shutting down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "stdio failure");
            ExitCode::FAILURE
        }
    }
}
