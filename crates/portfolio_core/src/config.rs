//! Environment configuration.
//!
//! # Responsibility
//! - Resolve remote endpoint, access key, cache path and logging settings.
//! - Detect placeholder values so the data layer can run in degraded mode.
//!
//! # Invariants
//! - Loading configuration never fails; missing values fall back to defaults.
//! - An unconfigured remote is a supported state, not an error.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_REMOTE_URL: &str = "PORTFOLIO_REMOTE_URL";
pub const ENV_REMOTE_KEY: &str = "PORTFOLIO_REMOTE_KEY";
pub const ENV_DB_PATH: &str = "PORTFOLIO_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "PORTFOLIO_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PORTFOLIO_LOG_DIR";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "PORTFOLIO_REQUEST_TIMEOUT_MS";

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_DB_FILE_NAME: &str = "portfolio_cache.sqlite3";

/// Values shipped in templates that must be treated as "not set".
const PLACEHOLDER_MARKERS: &[&str] = &["your-", "your_", "placeholder", "example.supabase"];
const PLACEHOLDER_VALUES: &[&str] = &["undefined", "null", "changeme", "xxx"];

/// Remote data service endpoint and credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub endpoint_url: String,
    pub access_key: String,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("access_key", &"<redacted>")
            .finish()
    }
}

impl RemoteConfig {
    pub fn new(endpoint_url: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into().trim().trim_end_matches('/').to_string(),
            access_key: access_key.into().trim().to_string(),
        }
    }

    /// Config with nothing set; every remote call short-circuits.
    pub fn unconfigured() -> Self {
        Self::new("", "")
    }

    /// Reads the endpoint and key from the process environment.
    pub fn from_env() -> Self {
        Self::new(
            env::var(ENV_REMOTE_URL).unwrap_or_default(),
            env::var(ENV_REMOTE_KEY).unwrap_or_default(),
        )
    }

    /// Returns whether real network connectivity should be attempted.
    pub fn is_configured(&self) -> bool {
        !is_placeholder(&self.endpoint_url)
            && !is_placeholder(&self.access_key)
            && (self.endpoint_url.starts_with("https://")
                || self.endpoint_url.starts_with("http://"))
    }
}

/// Full application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub remote: RemoteConfig,
    /// `None` keeps the fallback cache in memory for the session only.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Loads `.env` (if present) and then reads the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let timeout_ms = env::var(ENV_REQUEST_TIMEOUT_MS)
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);

        Self {
            remote: RemoteConfig::from_env(),
            db_path: non_blank_env(ENV_DB_PATH).map(PathBuf::from),
            log_level: non_blank_env(ENV_LOG_LEVEL)
                .unwrap_or_else(|| crate::logging::default_log_level().to_string()),
            log_dir: non_blank_env(ENV_LOG_DIR).map(PathBuf::from),
            request_timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Cache path under `data_dir` when no explicit path is configured.
    pub fn db_path_or(&self, data_dir: impl Into<PathBuf>) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| data_dir.into().join(DEFAULT_DB_FILE_NAME))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote: RemoteConfig::unconfigured(),
            db_path: None,
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn is_placeholder(value: &str) -> bool {
    let lowered = value.trim().to_ascii_lowercase();
    lowered.is_empty()
        || PLACEHOLDER_VALUES.contains(&lowered.as_str())
        || PLACEHOLDER_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::RemoteConfig;

    #[test]
    fn placeholder_values_are_unconfigured() {
        assert!(!RemoteConfig::unconfigured().is_configured());
        assert!(!RemoteConfig::new("https://your-project.supabase.co", "key").is_configured());
        assert!(!RemoteConfig::new("https://abc.supabase.co", "your_anon_key").is_configured());
        assert!(!RemoteConfig::new("abc.supabase.co", "real-key").is_configured());
    }

    #[test]
    fn real_values_are_configured_and_trailing_slash_trimmed() {
        let config = RemoteConfig::new(" https://abc.supabase.co/ ", " key123 ");
        assert!(config.is_configured());
        assert_eq!(config.endpoint_url, "https://abc.supabase.co");
        assert_eq!(config.access_key, "key123");
    }

    #[test]
    fn debug_output_redacts_access_key() {
        let rendered = format!("{:?}", RemoteConfig::new("https://abc.supabase.co", "secret"));
        assert!(!rendered.contains("secret"));
    }
}
