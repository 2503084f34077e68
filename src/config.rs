use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Parser, Debug, Default)]
#[command(name = "histview", about = "k9s-style terminal UI for the project audit history")]
pub struct Cli {
    /// History service base URL [default: http://localhost:8080]
    #[arg(long, env = "HISTVIEW_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, env = "HISTVIEW_TOKEN")]
    pub token: Option<String>,

    /// Polling interval in seconds [default: 5]
    #[arg(long)]
    pub poll_interval: Option<u64>,

    /// Request timeout in seconds [default: 10]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Log file path
    #[arg(long, env = "HISTVIEW_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Print the diff of one history record and exit
    #[arg(long, value_name = "ID")]
    pub print: Option<String>,
}

#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub poll_interval: Option<u64>,
    pub timeout: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFile {
    pub fn path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("histview").join("config.toml"))
    }

    /// Reads `~/.config/histview/config.toml`. A missing file is not an error.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Effective settings after layering flags over the config file over the
/// built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub token: Option<String>,
    pub poll_interval: Duration,
    pub timeout: Duration,
    pub log_file: Option<PathBuf>,
    pub print: Option<String>,
}

impl Settings {
    pub fn resolve(cli: Cli, file: Option<ConfigFile>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            api_url: cli
                .api_url
                .or(file.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token: cli.token.or(file.token).filter(|t| !t.trim().is_empty()),
            poll_interval: Duration::from_secs(
                cli.poll_interval
                    .or(file.poll_interval)
                    .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
                    .max(1),
            ),
            timeout: Duration::from_secs(
                cli.timeout
                    .or(file.timeout)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS)
                    .max(1),
            ),
            log_file: cli.log_file.or(file.log_file),
            print: cli.print,
        }
    }
}
