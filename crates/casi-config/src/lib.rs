//! Shared configuration for the casi CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `casi_core::ServiceConfig`. The CLI adds flag-aware
//! overrides on top; the core never reads config files or environment
//! variables itself.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use casi_core::{Credentials, ServiceConfig};

/// Keyring service name for stored secrets.
pub const KEYRING_SERVICE: &str = "casi";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

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

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    20
}

/// A named account profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Booking service base URL; the hosted installation when absent.
    pub base_url: Option<String>,

    /// Account username (the car-sharing login).
    pub username: Option<String>,

    /// Password (plaintext -- prefer keyring or `CASI_PASSWORD`).
    pub password: Option<String>,

    /// `X-API-Key` override; the client's built-in default when absent.
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Override request timeout (seconds).
    pub timeout: Option<u64>,

    /// Override cache directory.
    pub cache_dir: Option<PathBuf>,
}

// ── Paths ───────────────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "casi", "casi").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default cache directory for booking snapshots.
pub fn default_cache_dir() -> PathBuf {
    ProjectDirs::from("com", "casi", "casi")
        .map_or_else(|| PathBuf::from("cache"), |dirs| dirs.cache_dir().to_path_buf())
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("casi");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("CASI_CONFIG_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve credentials from a profile via the chain
/// env → keyring → plaintext config.
pub fn profile_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Credentials, ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("CASI_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    let password = resolve_password(profile, profile_name).ok_or_else(|| {
        ConfigError::NoCredentials {
            profile: profile_name.into(),
        }
    })?;

    let mut credentials = Credentials::new(username, password);
    if let Some(key) = resolve_api_key(profile, profile_name) {
        credentials = credentials.with_api_key(key);
    }
    Ok(credentials)
}

fn resolve_password(profile: &Profile, profile_name: &str) -> Option<String> {
    // 1. Environment
    if let Ok(pw) = std::env::var("CASI_PASSWORD") {
        return Some(pw);
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Some(pw);
        }
    }

    // 3. Plaintext in config
    profile.password.clone()
}

/// The API key is optional -- the client carries a well-known default.
fn resolve_api_key(profile: &Profile, profile_name: &str) -> Option<String> {
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(val);
        }
    }

    if let Ok(val) = std::env::var("CASI_API_KEY") {
        return Some(val);
    }

    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-key")) {
        if let Ok(key) = entry.get_password() {
            return Some(key);
        }
    }

    profile.api_key.clone()
}

/// Credentials from environment variables alone (profile-less operation).
pub fn env_credentials() -> Option<Credentials> {
    let username = std::env::var("CASI_USERNAME").ok()?;
    let password = std::env::var("CASI_PASSWORD").ok()?;
    let mut credentials = Credentials::new(username, password);
    if let Ok(key) = std::env::var("CASI_API_KEY") {
        credentials = credentials.with_api_key(key);
    }
    Some(credentials)
}

/// Store a password in the system keyring for `profile_name`.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .and_then(|entry| entry.set_password(password))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

// ── Translation to core config ──────────────────────────────────────

/// Build a `ServiceConfig` from a profile -- no CLI flag overrides.
///
/// Credentials are attached when resolvable; a profile without them still
/// yields a usable config (the shell prompts interactively).
pub fn profile_to_service_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ServiceConfig, ConfigError> {
    let mut config = ServiceConfig::default();

    if let Some(ref raw) = profile.base_url {
        config.base_url = raw.parse().map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
    }

    config.credentials = profile_credentials(profile, profile_name).ok();
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.cache_dir = profile
        .cache_dir
        .clone()
        .unwrap_or_else(default_cache_dir);

    Ok(config)
}
