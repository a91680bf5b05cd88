use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::http::HttpOptions;
use crate::retry::RetryPolicy;

pub const DEFAULT_INFO_ENDPOINT: &str = "https://api.steamcmd.net/v1/info";
pub const DEFAULT_ARTIFACT_ENDPOINT: &str = "https://api.manifesthub1.filegear-sg.me/manifest";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of download attempts per manifest (including the first).
    pub max_attempts: u32,
    /// Flat delay in seconds between attempts.
    pub delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay_secs: 3.0,
        }
    }
}

/// Global configuration loaded from `~/.config/dmf/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DmfConfig {
    /// Base URL of the app info service; the app id is appended as a path segment.
    pub info_endpoint: String,
    /// URL of the manifest download service; credentials and ids go in the query.
    pub artifact_endpoint: String,
    /// Timeout for the single info request, in seconds.
    pub info_timeout_secs: u64,
    /// Timeout for each download attempt, in seconds.
    pub download_timeout_secs: u64,
    /// Where manifests are written; defaults to `<steam>/depotcache`.
    pub output_dir: Option<PathBuf>,
    /// Steam install root; discovered automatically when unset.
    pub steam_path: Option<PathBuf>,
    /// Optional retry policy; if missing, built-in defaults are used.
    pub retry: Option<RetryConfig>,
}

impl Default for DmfConfig {
    fn default() -> Self {
        Self {
            info_endpoint: DEFAULT_INFO_ENDPOINT.to_string(),
            artifact_endpoint: DEFAULT_ARTIFACT_ENDPOINT.to_string(),
            info_timeout_secs: 30,
            download_timeout_secs: 120,
            output_dir: None,
            steam_path: None,
            retry: None,
        }
    }
}

impl DmfConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryPolicy::from)
            .unwrap_or_default()
    }

    pub fn info_http(&self) -> HttpOptions {
        HttpOptions::with_timeout(Duration::from_secs(self.info_timeout_secs.max(1)))
    }

    pub fn download_http(&self) -> HttpOptions {
        HttpOptions::with_timeout(Duration::from_secs(self.download_timeout_secs.max(1)))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dmf")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DmfConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DmfConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path; the file must exist.
pub fn load_from(path: &Path) -> Result<DmfConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: DmfConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
