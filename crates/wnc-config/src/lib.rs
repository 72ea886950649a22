//! Shared configuration for tools built on `wnc-api`.
//!
//! TOML profiles, access-token resolution (env + plaintext), and
//! translation to `wnc_api::ClientConfig`. The client core never reads
//! files or the environment itself; harnesses go through this crate.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use wnc_api::{Client, ClientConfig};

/// Environment variable holding the access token when a profile names none.
pub const TOKEN_ENV: &str = "WNC_ACCESS_TOKEN";

/// Environment variable overriding the profile's controller address.
pub const CONTROLLER_ENV: &str = "WNC_CONTROLLER";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' is not defined")]
    UnknownProfile { profile: String },

    #[error("no access token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Client(#[from] wnc_api::Error),

    #[error("failed to install log subscriber: {0}")]
    Logging(String),
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
    /// Profile used when none is requested explicitly.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
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
    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds; 0 selects the client default.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    wnc_api::DEFAULT_TIMEOUT.as_secs()
}

/// A named controller profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Controller address, e.g. `wnc1.example.internal` or `192.0.2.10:443`.
    pub controller: String,

    /// Access token (plaintext -- prefer `token_env`).
    pub token: Option<String>,

    /// Environment variable name containing the access token.
    pub token_env: Option<String>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    pub user_agent: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "wnc", "wnc").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("wnc");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then the TOML file at `path`, then `WNC_*` variables
/// (`WNC_DEFAULTS__TIMEOUT=30` sets `defaults.timeout`).
pub fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::prefixed("WNC_")
                .ignore(&["controller", "access_token"])
                .split("__"),
        )
}

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    Ok(figment_for(path).extract()?)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Resolution ──────────────────────────────────────────────────────

/// Resolve an access token: the profile's `token_env`, then
/// [`TOKEN_ENV`], then the plaintext `token`.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(val) = std::env::var(TOKEN_ENV) {
        return Ok(SecretString::from(val));
    }

    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Pick the requested profile, falling back to `default_profile`.
pub fn select_profile<'a>(
    config: &'a Config,
    requested: Option<&str>,
) -> Result<(String, &'a Profile), ConfigError> {
    let name = requested
        .map(str::to_owned)
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into());
    let profile = config
        .profiles
        .get(&name)
        .ok_or_else(|| ConfigError::UnknownProfile {
            profile: name.clone(),
        })?;
    Ok((name, profile))
}

/// Translate a profile into a `ClientConfig`.
///
/// Profile values override `[defaults]`; [`CONTROLLER_ENV`] overrides the
/// profile's controller address.
pub fn profile_to_client_config(
    config: &Config,
    profile: &Profile,
    profile_name: &str,
) -> Result<ClientConfig, ConfigError> {
    let controller = std::env::var(CONTROLLER_ENV).unwrap_or_else(|_| profile.controller.clone());
    if controller.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "controller".into(),
            reason: format!("profile '{profile_name}' has no controller address"),
        });
    }

    let token = resolve_token(profile, profile_name)?;
    let timeout = Duration::from_secs(profile.timeout.unwrap_or(config.defaults.timeout));

    let mut builder = ClientConfig::builder_with_token(controller, token)
        .timeout(timeout)
        .insecure_skip_verify(profile.insecure.unwrap_or(config.defaults.insecure));
    if let Some(ref ua) = profile.user_agent {
        builder = builder.user_agent(ua.clone());
    }

    Ok(builder.build())
}

/// Load the canonical config and build a client for `requested`
/// (or the default profile).
pub fn client_from_profile(requested: Option<&str>) -> Result<Client, ConfigError> {
    let config = load_config()?;
    let (name, profile) = select_profile(&config, requested)?;
    let client_config = profile_to_client_config(&config, profile, &name)?;
    Ok(Client::new(client_config)?)
}

// ── Logging ─────────────────────────────────────────────────────────

/// Install a process-wide `fmt` subscriber for harness binaries.
///
/// `RUST_LOG` wins over `verbosity` (0 = warn ... 3+ = trace). Clients
/// built with the default logger pick this subscriber up.
pub fn init_tracing(verbosity: u8) -> Result<(), ConfigError> {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))
}
