//! Client configuration.
//!
//! Settings come from code, the environment (`AIRHUB_*` variables) or a
//! YAML file. Missing keys fall back to the defaults below.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use airhub_protocol::base_urls;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

pub const ENV_BASE_URL: &str = "AIRHUB_BASE_URL";
pub const ENV_API_KEY: &str = "AIRHUB_API_KEY";
pub const ENV_CLIENT_ID: &str = "AIRHUB_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "AIRHUB_CLIENT_SECRET";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "AIRHUB_REQUEST_TIMEOUT_SECS";

/// Upper bound on `token_refresh_margin_secs` (one day).
pub const MAX_TOKEN_REFRESH_MARGIN_SECS: i64 = 86_400;

/// Connection and credential settings for [`AirHubClient`](crate::AirHubClient).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root, without a trailing path.
    pub base_url: String,

    /// Sent as `x-api-key` on every request.
    pub api_key: String,

    /// OAuth client credentials.
    pub client_id: String,
    pub client_secret: String,

    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// A cached token is refreshed once it is this close to expiring.
    pub token_refresh_margin_secs: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: base_urls::PRODUCTION.to_string(),
            api_key: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            token_refresh_margin_secs: 60,
        }
    }
}

// Credentials stay out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("token_refresh_margin_secs", &self.token_refresh_margin_secs)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        ""
    } else {
        "***"
    }
}

impl ClientConfig {
    /// Production settings with the given credentials.
    pub fn new(
        api_key: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            ..Default::default()
        }
    }

    /// Point at the sandbox environment.
    pub fn sandbox(mut self) -> Self {
        self.base_url = base_urls::SANDBOX.to_string();
        self
    }

    /// Point at an arbitrary API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a key lookup, starting from the defaults.
    ///
    /// `from_env` with an injectable source, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup(ENV_BASE_URL) {
            config.base_url = val;
        }
        if let Some(val) = lookup(ENV_API_KEY) {
            config.api_key = val;
        }
        if let Some(val) = lookup(ENV_CLIENT_ID) {
            config.client_id = val;
        }
        if let Some(val) = lookup(ENV_CLIENT_SECRET) {
            config.client_secret = val;
        }
        if let Some(val) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout_secs = val.trim().parse().map_err(|_| {
                ClientError::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_REQUEST_TIMEOUT_SECS, val
                ))
            })?;
        }

        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn load_from_file(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            ClientError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Validate the configuration, returning the parsed base URL.
    pub fn validate(&self) -> ClientResult<Url> {
        let url = parse_base_url(&self.base_url)?;

        if self.request_timeout_secs == 0 {
            return Err(ClientError::Config(
                "request_timeout_secs must be > 0".to_string(),
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ClientError::Config(
                "connect_timeout_secs must be > 0".to_string(),
            ));
        }
        if !(0..=MAX_TOKEN_REFRESH_MARGIN_SECS).contains(&self.token_refresh_margin_secs) {
            return Err(ClientError::Config(format!(
                "token_refresh_margin_secs must be between 0 and {}",
                MAX_TOKEN_REFRESH_MARGIN_SECS
            )));
        }

        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Saturates instead of panicking on values `validate` would reject.
    pub fn token_refresh_margin(&self) -> chrono::Duration {
        chrono::Duration::try_seconds(self.token_refresh_margin_secs).unwrap_or(
            if self.token_refresh_margin_secs < 0 {
                chrono::Duration::MIN
            } else {
                chrono::Duration::MAX
            },
        )
    }
}

fn parse_base_url(raw: &str) -> ClientResult<Url> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }

    Ok(url)
}
