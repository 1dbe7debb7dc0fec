//! Environment-driven settings. `.env` is loaded by the binary before
//! [`AppConfig::from_env`] runs.

use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_OSRM_URL: &str = "http://router.project-osrm.org";
pub const DEFAULT_MODEL_PATH: &str = "temperature_model.json";
pub const DEFAULT_USER_AGENT: &str = "TempTraverseApp/1.0";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub nominatim_url: String,
    pub osrm_url: String,
    pub model_path: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            osrm_url: DEFAULT_OSRM_URL.to_string(),
            model_path: DEFAULT_MODEL_PATH.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let secs = |key: &str, fallback: Duration| -> Result<Duration> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("{key} must be a whole number of seconds, got '{raw}'")),
                None => Ok(fallback),
            }
        };

        Ok(Self {
            nominatim_url: lookup("NOMINATIM_URL").unwrap_or(defaults.nominatim_url),
            osrm_url: lookup("OSRM_URL").unwrap_or(defaults.osrm_url),
            model_path: lookup("MODEL_PATH").unwrap_or(defaults.model_path),
            user_agent: lookup("HTTP_USER_AGENT").unwrap_or(defaults.user_agent),
            timeout: secs("HTTP_TIMEOUT_SECS", defaults.timeout)?,
            connect_timeout: secs("HTTP_CONNECT_TIMEOUT_SECS", defaults.connect_timeout)?,
        })
    }
}
