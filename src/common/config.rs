//! Configuration schema, defaults, and layered loading.
//!
//! Precedence: defaults < config file < environment < CLI
use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use super::constants::{DEFAULT_COUNT, DEFAULT_PORT, UNLIMITED};

pub const ENV_PREFIX: &str = "RUFF_";

pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "ruff")
        .map(|p| p.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("ruff.toml"))
}

/// Startup validation failures. Any of these ends the process before it listens.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no file provided to download")]
    MissingFile,

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("cannot determine a file name from {}", .0.display())]
    InvalidFileName(PathBuf),

    #[error("invalid count {0}: must be -1 for unlimited or a positive number")]
    InvalidCount(i64),
}

/// Command line surface. Every layered field is optional so an unset flag
/// never masks the config file or environment.
#[derive(Parser, Debug, Clone, Default, Serialize)]
#[command(name = "ruff", version)]
#[command(about = "Pop-up web server to retrieve or upload files fast over LAN")]
pub struct CliArgs {
    /// Number of transfers before exiting. Set to -1 for unlimited.
    #[arg(short, long, allow_negative_numbers = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,

    /// Port to serve on.
    #[arg(short, long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Hide the QR code.
    #[arg(short = 'q', long)]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hide_qr: bool,

    /// Upload files instead of downloading.
    #[arg(short, long)]
    #[serde(skip)]
    pub upload: bool,

    /// Allow uploading multiple files at once (`--multiple=false` to forbid).
    #[arg(short, long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple: Option<bool>,

    /// File to offer for download.
    #[serde(skip)]
    pub file: Option<PathBuf>,
}

/// Fully merged configuration, before it is bound to a transfer mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub count: i64,
    pub port: u16,
    pub hide_qr: bool,
    pub multiple: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            port: DEFAULT_PORT,
            hide_qr: false,
            multiple: true,
        }
    }
}

impl AppConfig {
    /// Rejects transfer counts that can never be satisfied.
    pub fn validate(&self) -> Result<()> {
        TransferLimit::from_count(self.count).context("Invalid config: count")?;
        Ok(())
    }
}

/// Loads config from defaults/file/env/CLI.
pub fn load_config(cli: &CliArgs) -> Result<AppConfig> {
    let path = config_path();

    let config: AppConfig = Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(cli))
        .extract()
        .context("Failed to load configuration")?;

    config.validate()?;

    Ok(config)
}

/// How many transfer units the session permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferLimit {
    Unlimited,
    Limited(NonZeroU32),
}

impl TransferLimit {
    pub fn from_count(count: i64) -> Result<Self, ConfigError> {
        if count == UNLIMITED {
            return Ok(TransferLimit::Unlimited);
        }
        u32::try_from(count)
            .ok()
            .and_then(NonZeroU32::new)
            .map(TransferLimit::Limited)
            .ok_or(ConfigError::InvalidCount(count))
    }

    /// Initial value of the session counter; the unlimited sentinel is -1.
    pub fn initial_remaining(self) -> i64 {
        match self {
            TransferLimit::Unlimited => UNLIMITED,
            TransferLimit::Limited(n) => i64::from(n.get()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferMode {
    Download { file_path: PathBuf, file_name: String },
    Upload { allow_multiple: bool },
}

impl TransferMode {
    pub fn is_upload(&self) -> bool {
        matches!(self, TransferMode::Upload { .. })
    }
}

/// Immutable, validated settings handed to the transfer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub mode: TransferMode,
    pub limit: TransferLimit,
    pub port: u16,
    pub show_qr: bool,
}

impl SessionConfig {
    /// Binds the merged config to a transfer mode picked on the command line.
    pub fn resolve(config: &AppConfig, cli: &CliArgs) -> Result<Self, ConfigError> {
        let limit = TransferLimit::from_count(config.count)?;

        let mode = if cli.upload {
            TransferMode::Upload {
                allow_multiple: config.multiple,
            }
        } else {
            let file_path = cli
                .file
                .clone()
                .filter(|p| !p.as_os_str().is_empty())
                .ok_or(ConfigError::MissingFile)?;
            if !file_path.is_file() {
                return Err(ConfigError::FileNotFound(file_path));
            }
            let file_name = file_name_of(&file_path)?;
            TransferMode::Download {
                file_path,
                file_name,
            }
        };

        Ok(Self {
            mode,
            limit,
            port: config.port,
            show_qr: !config.hide_qr,
        })
    }
}

fn file_name_of(path: &Path) -> Result<String, ConfigError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::InvalidFileName(path.to_path_buf()))
}
