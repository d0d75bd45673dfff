//! Configuration for bearer-hooks.
//!
//! Priority: environment variable > settings file > default. A `.env` file in
//! the working directory is loaded into the environment first.
//!
//! Settings file: `$BEARER_HOOKS_CONFIG`, or `~/.bearer-hooks/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::hooks::{DEFAULT_SUCCESS_STATUS, DEFAULT_TOKEN_FIELD, DEFAULT_TOKEN_VARIABLE};
use crate::variables::FileStore;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: TokenConfig,
    pub client: ClientConfig,
    /// Where the file-backed variable store lives.
    pub vars_path: PathBuf,
}

impl Config {
    /// Load configuration from the environment and the settings file.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let settings = Settings::load()?;
        Self::resolve(&settings)
    }

    /// Resolve configuration from env vars on top of `settings`.
    pub fn resolve(settings: &Settings) -> Result<Self, ConfigError> {
        let vars_path = optional_env("BEARER_HOOKS_VARS_PATH")?
            .map(PathBuf::from)
            .or_else(|| settings.vars_path.clone())
            .unwrap_or_else(FileStore::default_path);

        Ok(Self {
            token: TokenConfig::resolve(settings)?,
            client: ClientConfig::resolve(settings)?,
            vars_path,
        })
    }
}

/// Which variable and response field the token hooks use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    /// Variable holding the token (default `auth_token`).
    pub variable: String,
    /// Response field, or JSON pointer, carrying the token (default `token`).
    pub field: String,
    /// Status code that triggers a capture (default 200).
    pub success_status: u16,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            variable: DEFAULT_TOKEN_VARIABLE.to_string(),
            field: DEFAULT_TOKEN_FIELD.to_string(),
            success_status: DEFAULT_SUCCESS_STATUS,
        }
    }
}

impl TokenConfig {
    fn resolve(settings: &Settings) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let variable = optional_env("BEARER_HOOKS_VARIABLE")?
            .or_else(|| settings.variable.clone())
            .unwrap_or(defaults.variable);
        if variable.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "BEARER_HOOKS_VARIABLE".to_string(),
                message: "must not be blank".to_string(),
            });
        }

        let field = optional_env("BEARER_HOOKS_TOKEN_FIELD")?
            .or_else(|| settings.token_field.clone())
            .unwrap_or(defaults.field);

        let success_status = parse_optional_env(
            "BEARER_HOOKS_SUCCESS_STATUS",
            settings.success_status.unwrap_or(defaults.success_status),
        )?;
        if !(100..=599).contains(&success_status) {
            return Err(ConfigError::InvalidValue {
                key: "BEARER_HOOKS_SUCCESS_STATUS".to_string(),
                message: format!("{success_status} is not an HTTP status code"),
            });
        }

        Ok(Self {
            variable,
            field,
            success_status,
        })
    }
}

/// HTTP client settings for the bundled host.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL relative request URLs are joined onto.
    pub base_url: Option<url::Url>,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    fn resolve(settings: &Settings) -> Result<Self, ConfigError> {
        let base_url = optional_env("BEARER_HOOKS_BASE_URL")?
            .or_else(|| settings.base_url.clone().filter(|s| !s.is_empty()))
            .map(|raw| parse_base_url("BEARER_HOOKS_BASE_URL", &raw))
            .transpose()?;

        let timeout_secs = parse_optional_env(
            "BEARER_HOOKS_TIMEOUT_SECS",
            settings.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "BEARER_HOOKS_TIMEOUT_SECS".to_string(),
                message: "must be at least 1 second".to_string(),
            });
        }

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Validate a base URL: must parse and use http or https. The path always
/// ends in `/` so relative URLs join below it rather than beside it.
pub fn parse_base_url(key: &str, raw: &str) -> Result<url::Url, ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{raw}' is not a valid URL: {e}"),
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("scheme '{}' not allowed; use http or https", parsed.scheme()),
        });
    }
    Ok(with_trailing_slash(parsed))
}

/// `http://host/api` -> `http://host/api/`; already-terminated paths are kept.
pub(crate) fn with_trailing_slash(mut url: url::Url) -> url::Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// On-disk settings. Every field is optional; env vars override them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub variable: Option<String>,
    pub token_field: Option<String>,
    pub success_status: Option<u16>,
    pub vars_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Default settings path: `~/.bearer-hooks/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bearer-hooks")
            .join("config.toml")
    }

    /// Load from `$BEARER_HOOKS_CONFIG` or the default path. A missing file
    /// yields defaults; a malformed one is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let path = optional_env("BEARER_HOOKS_CONFIG")?
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_path);
        Self::load_from(&path)
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(data) => toml::from_str(&data).map_err(|e| {
                ConfigError::ParseError(format!("{}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Io(e)),
        }
    }
}

// Helper functions

pub(crate) fn optional_env(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(val) if val.is_empty() => Ok(None),
        Ok(val) => Ok(Some(val)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::ParseError(format!(
            "failed to read {key}: {e}"
        ))),
    }
}

pub(crate) fn parse_optional_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional_env(key)?
        .map(|s| {
            s.parse().map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{e}"),
            })
        })
        .transpose()
        .map(|opt| opt.unwrap_or(default))
}
