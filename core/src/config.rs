//! Endpoint and credential configuration.
//!
//! Sources, highest priority first:
//! 1. Environment variables with the `AJERA_` prefix (`AJERA_API_URL`,
//!    `AJERA_USERNAME`, `AJERA_PASSWORD`, `AJERA_USE_SESSION_COOKIE`)
//! 2. A TOML file (`ajera.toml` in the working directory unless another
//!    path is given)
//! 3. Built-in defaults

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::Credentials;

pub const DEFAULT_CONFIG_FILE: &str = "ajera.toml";
pub const ENV_PREFIX: &str = "AJERA_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("required setting '{field}' is not configured")]
    NotConfigured { field: &'static str },
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AjeraConfig {
    /// Full URL of the API endpoint, including any query string the
    /// account's URL carries.
    #[serde(default)]
    pub api_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub use_session_cookie: bool,
}

impl AjeraConfig {
    /// Load from `ajera.toml` (if present) and the environment, then validate.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(path).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// The provider chain, exposed so callers can layer more providers on top.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        let path = path.as_ref();
        if path.exists() {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("api_url", &self.api_url),
            ("username", &self.username),
            ("password", &self.password),
        ];
        match required.into_iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(ConfigError::NotConfigured { field }),
            None => Ok(()),
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
            use_session_cookie: self.use_session_cookie,
        }
    }
}

impl std::fmt::Debug for AjeraConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AjeraConfig")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("use_session_cookie", &self.use_session_cookie)
            .finish()
    }
}
