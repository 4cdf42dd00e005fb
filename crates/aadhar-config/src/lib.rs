//! Configuration for the Aadhar CLI.
//!
//! TOML config file, `AADHAR_*` environment overrides, and selection of the
//! persistent session store the API client keeps its tokens in.

mod store;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use aadhar_api::{
    DEFAULT_PAGE_SIZE, DEFAULT_QUERY_RETRIES, MemoryStore, SessionStore, TlsMode, TransportConfig,
};

pub use store::{FileStore, KeyringStore};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Store backend ───────────────────────────────────────────────────

/// Where the session tokens live between invocations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// `session.json` in the platform data directory.
    #[default]
    File,
    /// The OS keyring.
    Keyring,
    /// Process memory only; nothing survives the command.
    Memory,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::File => "file",
            Self::Keyring => "keyring",
            Self::Memory => "memory",
        })
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "keyring" => Ok(Self::Keyring),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "expected 'file', 'keyring', or 'memory', got '{other}'"
            )),
        }
    }
}

// ── Config ──────────────────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL.
    pub api_url: String,

    /// Request timeout in seconds.
    pub timeout: u64,

    /// Rows per page for `aadhar data`.
    pub page_size: u32,

    /// Extra attempts for reads after a transient failure.
    pub query_retries: u32,

    /// Session store backend.
    pub store: StoreBackend,

    /// Keyring namespace, so several accounts can stay signed in.
    pub profile: String,

    /// Accept invalid TLS certificates.
    pub insecure: bool,

    /// Path to a custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8081".into(),
            timeout: 30,
            page_size: DEFAULT_PAGE_SIZE,
            query_retries: DEFAULT_QUERY_RETRIES,
            store: StoreBackend::default(),
            profile: "default".into(),
            insecure: false,
            ca_cert: None,
        }
    }
}

impl Config {
    /// The parsed backend URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let url: Url = self.api_url.parse().map_err(|e| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("{e}: {}", self.api_url),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "api_url".into(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(url)
    }

    /// TLS and timeout settings for the HTTP client.
    pub fn transport(&self) -> TransportConfig {
        let tls = if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca) = self.ca_cert {
            TlsMode::CustomCa(ca.clone())
        } else {
            TlsMode::System
        };

        TransportConfig {
            tls,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "aadhar", "aadhar")
}

fn home_fallback(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.extend(parts);
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".config", "aadhar", "config.toml"]),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where `FileStore` keeps the session tokens.
pub fn session_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".local", "share", "aadhar", "session.json"]),
        |dirs| dirs.data_dir().join("session.json"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from `path` + environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("AADHAR_"))
        .extract()?;
    config.base_url()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Saving ──────────────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Session store ───────────────────────────────────────────────────

/// Open the session store `cfg` selects.
pub fn build_store(cfg: &Config) -> Arc<dyn SessionStore> {
    match cfg.store {
        StoreBackend::File => Arc::new(FileStore::new(session_path())),
        StoreBackend::Keyring => Arc::new(KeyringStore::new(&cfg.profile)),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    }
}
