//! Console configuration from the environment.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use backoffice_auth::{DEFAULT_LOGIN_PATH, DEFAULT_UNAUTHORIZED_PATH};
use backoffice_observability::{LogConfig, LogFormat};
use backoffice_session::FileStorage;
use backoffice_transport::PublicPaths;

pub const API_URL_VAR: &str = "BACKOFFICE_API_URL";
pub const DATA_DIR_VAR: &str = "BACKOFFICE_DATA_DIR";
pub const LOGIN_PATH_VAR: &str = "BACKOFFICE_LOGIN_PATH";
pub const UNAUTHORIZED_PATH_VAR: &str = "BACKOFFICE_UNAUTHORIZED_PATH";
pub const HTTP_TIMEOUT_VAR: &str = "BACKOFFICE_HTTP_TIMEOUT_SECS";
pub const PUBLIC_PATHS_VAR: &str = "BACKOFFICE_PUBLIC_PATHS";
pub const LOG_FORMAT_VAR: &str = "BACKOFFICE_LOG_FORMAT";

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },

    #[error("{var} must be a whole number of seconds greater than zero, got '{value}'")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{var} must be an absolute path starting with '/', got '{value}'")]
    InvalidRoute { var: &'static str, value: String },

    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Validated absolute URL of the API.
    pub api_url: String,
    /// Overrides the platform data directory for the durable session file.
    pub data_dir: Option<PathBuf>,
    pub login_path: String,
    pub unauthorized_path: String,
    pub http_timeout: Duration,
    /// Extra public prefixes on top of the built-in auth endpoints.
    pub extra_public_paths: Vec<String>,
    pub log: LogConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: None,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            unauthorized_path: DEFAULT_UNAUTHORIZED_PATH.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            extra_public_paths: Vec::new(),
            log: LogConfig::default(),
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset and blank variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(raw) = var(API_URL_VAR) {
            Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
                var: API_URL_VAR,
                reason: e.to_string(),
            })?;
            config.api_url = raw;
        }

        config.data_dir = var(DATA_DIR_VAR).map(PathBuf::from);

        if let Some(path) = var(LOGIN_PATH_VAR) {
            config.login_path = route(LOGIN_PATH_VAR, path)?;
        }
        if let Some(path) = var(UNAUTHORIZED_PATH_VAR) {
            config.unauthorized_path = route(UNAUTHORIZED_PATH_VAR, path)?;
        }

        if let Some(raw) = var(HTTP_TIMEOUT_VAR) {
            let secs: u64 = raw
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout {
                    var: HTTP_TIMEOUT_VAR,
                    value: raw.clone(),
                })?;
            config.http_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = var(PUBLIC_PATHS_VAR) {
            config.extra_public_paths = raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(raw) = var(LOG_FORMAT_VAR) {
            config.log.format = raw
                .parse::<LogFormat>()
                .map_err(|reason| ConfigError::Invalid {
                    var: LOG_FORMAT_VAR,
                    reason,
                })?;
        }

        Ok(config)
    }

    /// API base as the client expects it, without a trailing slash.
    pub fn api_base(&self) -> String {
        self.api_url.trim_end_matches('/').to_string()
    }

    /// Durable session file, if any location is known.
    pub fn session_file(&self) -> Option<PathBuf> {
        match &self.data_dir {
            Some(dir) => Some(dir.join(SESSION_FILE)),
            None => FileStorage::default_path(),
        }
    }

    pub fn public_paths(&self) -> PublicPaths {
        self.extra_public_paths
            .iter()
            .cloned()
            .fold(PublicPaths::default(), |paths, prefix| paths.with(prefix))
    }
}

fn route(var: &'static str, value: String) -> Result<String, ConfigError> {
    if value.starts_with('/') {
        Ok(value)
    } else {
        Err(ConfigError::InvalidRoute { var, value })
    }
}
