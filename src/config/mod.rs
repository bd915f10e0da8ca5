//! Screeps server configuration: loading and validation.
//!
//! The configuration is normally kept in a JSON file next to the bundler
//! config:
//!
//! ```json
//! {
//!   "token": "...",
//!   "protocol": "https",
//!   "hostname": "screeps.com",
//!   "port": 443,
//!   "path": "/",
//!   "branch": "auto"
//! }
//! ```
//!
//! Private servers may use `email` and `password` instead of `token`. The
//! public server only accepts tokens.

use crate::error::{DeployError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Hostname of the official public server, which only accepts token authentication.
pub const CANONICAL_HOST: &str = "screeps.com";

/// Transport scheme used to reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection and target settings for one upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreepsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub protocol: Protocol,
    pub hostname: String,
    pub port: u16,
    /// Base path of the server, `/` for the public server.
    pub path: String,
    /// Target branch, or `"auto"` for the checked-out git branch.
    pub branch: String,
}

/// How a configuration authenticates against the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth<'a> {
    Token(&'a str),
    Credentials { email: &'a str, password: &'a str },
}

impl ScreepsConfig {
    /// Build a configuration from an in-memory JSON value.
    ///
    /// Applies the same typing rules as [`load_config_file`]; it does not run [`validate`](Self::validate).
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| DeployError::config(e.to_string()))
    }

    /// Authentication mode, preferring a token over credentials.
    pub fn auth(&self) -> Option<Auth<'_>> {
        if let Some(token) = self.token.as_deref() {
            return Some(Auth::Token(token));
        }
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) => Some(Auth::Credentials { email, password }),
            _ => None,
        }
    }

    pub fn is_canonical_host(&self) -> bool {
        self.hostname == CANONICAL_HOST
    }

    /// Check required fields and the authentication rules.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::ConfigInvalid`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.hostname.trim().is_empty() {
            return Err(DeployError::config("hostname must not be empty"));
        }
        if self.branch.is_empty() {
            return Err(DeployError::config("branch must not be empty"));
        }

        match self.auth() {
            Some(Auth::Token(_)) => Ok(()),
            Some(Auth::Credentials { .. }) if self.is_canonical_host() => Err(DeployError::config(
                format!("{CANONICAL_HOST} requires a token, email/password is not accepted"),
            )),
            Some(Auth::Credentials { .. }) => Ok(()),
            None if self.is_canonical_host() => {
                Err(DeployError::config(format!("{CANONICAL_HOST} requires a token")))
            }
            None => Err(DeployError::config(
                "either token or email and password must be set",
            )),
        }
    }

    /// Root URL of the server, always ending in `/` so API paths can be joined onto it.
    pub fn base_url(&self) -> Result<Url> {
        let mut path = self.path.trim().to_string();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        if !path.ends_with('/') {
            path.push('/');
        }

        let raw = format!("{}://{}:{}{}", self.protocol, self.hostname, self.port, path);
        Url::parse(&raw).map_err(|e| DeployError::config(format!("invalid server url {raw}: {e}")))
    }
}

/// Pure validity check, usable as a guard before any network operation.
pub fn validate_config(config: &ScreepsConfig) -> bool {
    config.validate().is_ok()
}

/// Read and parse a JSON configuration file.
///
/// Fails when required fields are missing or have the wrong type. The
/// authentication rules are not enforced here; a credentials-only config for
/// the public server only produces a warning so that the later validation
/// error does not come as a surprise.
///
/// Reads synchronously: the file is small and read once per run, before any
/// network step.
pub fn load_config_file(path: &Path) -> Result<ScreepsConfig> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| DeployError::fs("reading config file", path, e))?;

    let config: ScreepsConfig = serde_json::from_str(&data)
        .map_err(|e| DeployError::config(format!("{}: {}", path.display(), e)))?;

    if config.is_canonical_host() && config.token.is_none() && config.email.is_some() {
        log::warn!(
            "{} uses email/password for {}. The public server only accepts auth tokens, \
             generate one in your account settings and set \"token\" instead.",
            path.display(),
            CANONICAL_HOST
        );
    }

    Ok(config)
}
