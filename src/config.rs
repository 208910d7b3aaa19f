//! Client defaults and their `HRB_*` environment overrides.

use log::debug;
use reqwest::Client;
use std::env;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::http::HttpTransport;

/// Timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_TIMEOUT_SECS: &str = "HRB_TIMEOUT_SECS";
pub const ENV_STRICT_DECODING: &str = "HRB_STRICT_DECODING";
pub const ENV_USER_AGENT: &str = "HRB_USER_AGENT";
pub const ENV_LOG_TRAFFIC: &str = "HRB_LOG_TRAFFIC";

/// Defaults applied to every builder created from this configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub strict_decoding: bool,
    pub user_agent: String,
    pub log_traffic: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            strict_decoding: true,
            user_agent: default_user_agent(),
            log_traffic: false,
        }
    }
}

pub fn default_user_agent() -> String {
    format!("hrb/{}", env!("HRB_VERSION"))
}

impl ClientConfig {
    /// Reads overrides from `HRB_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from a variable lookup; unset variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: f64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "{} must be a number of seconds, got {:?}",
                    ENV_TIMEOUT_SECS, raw
                ))
            })?;
            config.timeout = Duration::try_from_secs_f64(secs).map_err(|_| {
                Error::Config(format!("{} is out of range: {:?}", ENV_TIMEOUT_SECS, raw))
            })?;
        }
        if let Some(raw) = lookup(ENV_STRICT_DECODING) {
            config.strict_decoding = parse_flag(ENV_STRICT_DECODING, &raw)?;
        }
        if let Some(raw) = lookup(ENV_USER_AGENT) {
            config.user_agent = raw;
        }
        if let Some(raw) = lookup(ENV_LOG_TRAFFIC) {
            config.log_traffic = parse_flag(ENV_LOG_TRAFFIC, &raw)?;
        }

        debug!("Loaded client config: {:?}", config);
        Ok(config)
    }

    /// Builds the default transport for this configuration.
    pub fn transport(&self) -> Result<HttpTransport> {
        let client = Client::builder()
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(HttpTransport::new(client).with_traffic_logging(self.log_traffic))
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!("{} must be a boolean, got {:?}", key, raw))),
    }
}
