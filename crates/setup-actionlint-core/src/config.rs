use crate::release::DEFAULT_RELEASE_BASE_URL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "setup-actionlint";

/// HTTP transport limits (optional `[http]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub low_speed_limit_bytes: u32,
    pub low_speed_time_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 600,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
        }
    }
}

/// Configuration loaded from `~/.config/setup-actionlint/config.toml`.
///
/// Every key is optional. On a GitHub runner the defaults plus the runner's
/// environment are all that is needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupConfig {
    /// Tool cache root. Falls back to `RUNNER_TOOL_CACHE`, then the user cache dir.
    #[serde(default)]
    pub tool_cache: Option<PathBuf>,
    /// Scratch dir for downloads and extraction. Falls back to `RUNNER_TEMP`, then the system temp dir.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
    /// Release download root; assets are fetched from `{base}/v{version}/`.
    #[serde(default = "default_release_base_url")]
    pub release_base_url: String,
    /// JSON checksum table replacing the embedded one.
    #[serde(default)]
    pub checksums_file: Option<PathBuf>,
    /// Write logs here instead of stderr.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_release_base_url() -> String {
    DEFAULT_RELEASE_BASE_URL.to_string()
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            tool_cache: None,
            temp_dir: None,
            release_base_url: default_release_base_url(),
            checksums_file: None,
            log_file: None,
            http: HttpConfig::default(),
        }
    }
}

impl SetupConfig {
    pub fn tool_cache_dir(&self) -> Result<PathBuf> {
        resolve_dir(
            self.tool_cache.as_deref(),
            std::env::var_os("RUNNER_TOOL_CACHE"),
            default_cache_dir,
        )
    }

    pub fn temp_root(&self) -> Result<PathBuf> {
        resolve_dir(
            self.temp_dir.as_deref(),
            std::env::var_os("RUNNER_TEMP"),
            || Ok(std::env::temp_dir().join(APP_NAME)),
        )
    }
}

/// Configured path, else a non-empty runner env value, else `fallback`.
fn resolve_dir(
    configured: Option<&Path>,
    env_value: Option<OsString>,
    fallback: impl FnOnce() -> Result<PathBuf>,
) -> Result<PathBuf> {
    if let Some(p) = configured {
        return Ok(p.to_path_buf());
    }
    match env_value {
        Some(v) if !v.is_empty() => Ok(PathBuf::from(v)),
        _ => fallback(),
    }
}

#[cfg(unix)]
fn default_cache_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME)?;
    Ok(xdg_dirs.get_cache_home().join("tool-cache"))
}

#[cfg(not(unix))]
fn default_cache_dir() -> Result<PathBuf> {
    let base = std::env::var_os("LOCALAPPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    Ok(base.join(APP_NAME).join("tool-cache"))
}

/// Existing config file in the XDG config dirs, if any.
#[cfg(unix)]
pub fn config_path() -> Result<Option<PathBuf>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME)?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

#[cfg(not(unix))]
pub fn config_path() -> Result<Option<PathBuf>> {
    Ok(None)
}

/// Load configuration. An explicit path must exist; without one the default
/// location is used if present, otherwise built-in defaults apply.
pub fn load(explicit: Option<&Path>) -> Result<SetupConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match config_path()? {
            Some(p) => p,
            None => return Ok(SetupConfig::default()),
        },
    };
    let data =
        fs::read_to_string(&path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: SetupConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}
