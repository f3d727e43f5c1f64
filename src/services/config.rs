//! Configuration loading
//!
//! Reads `~/.foodtrack/config.toml` (every key optional) and applies
//! environment overrides. A missing file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::store::default_data_dir;
use crate::types::{FoodtrackError, Result};

const CONFIG_FILE: &str = "config.toml";

/// Session cookie override
pub const ENV_COOKIE: &str = "FOODTRACK_COOKIE";
/// Upstream base URL override
pub const ENV_BASE_URL: &str = "FOODTRACK_BASE_URL";

const DEFAULT_BASE_URL: &str = "https://www.zomato.com";
const DEFAULT_ORDERS_PATH: &str = "/webroutes/user/orders";
const DEFAULT_USER_AGENT: &str = concat!("foodtrack/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site root, also probed for host readiness
    pub base_url: String,
    /// Paginated order history endpoint, relative to `base_url`
    pub orders_path: String,
    /// `Cookie` header of an already logged-in session
    pub cookie: Option<String>,
    pub user_agent: String,
    /// Fixed wait between page requests
    pub page_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub ready_attempts: u32,
    pub ready_interval_ms: u64,
    /// Wait after the host reports ready, before the first command
    pub settle_delay_ms: u64,
    pub delivery_attempts: u32,
    pub delivery_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            orders_path: DEFAULT_ORDERS_PATH.to_string(),
            cookie: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_delay_ms: 1000,
            request_timeout_secs: 30,
            ready_attempts: 20,
            ready_interval_ms: 1000,
            settle_delay_ms: 2000,
            delivery_attempts: 20,
            delivery_interval_ms: 2000,
        }
    }
}

impl Config {
    /// Load from `path` (or the default location) and apply env overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };
        let mut config = Self::from_file(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a config file; a missing file yields the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| FoodtrackError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| FoodtrackError::Config(e.to_string()))
    }

    /// Apply overrides from a variable lookup (injectable for tests)
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(cookie) = lookup(ENV_COOKIE).filter(|c| !c.trim().is_empty()) {
            self.cookie = Some(cookie);
        }
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            self.base_url = base_url;
        }
    }

    /// Full page URL without the query string
    pub fn orders_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.orders_path.trim_start_matches('/')
        )
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Copy safe to print: the cookie is masked
    pub fn redacted(&self) -> Self {
        Self {
            cookie: self.cookie.as_ref().map(|_| "<redacted>".to_string()),
            ..self.clone()
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| FoodtrackError::Config(e.to_string()))
    }
}

/// `~/.foodtrack/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    Ok(default_data_dir()?.join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.page_delay(), Duration::from_millis(1000));
        assert_eq!(config.ready_attempts, 20);
        assert_eq!(
            config.orders_url(),
            "https://www.zomato.com/webroutes/user/orders"
        );
        assert!(config.cookie.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("page_delay_ms = 250\ncookie = \"sid=abc\"").unwrap();
        assert_eq!(config.page_delay_ms, 250);
        assert_eq!(config.cookie.as_deref(), Some("sid=abc"));
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml("page_delay_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, FoodtrackError::Config(_)));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::from_file(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "base_url = \"http://localhost:8080/\"").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(
            config.orders_url(),
            "http://localhost:8080/webroutes/user/orders"
        );
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            ENV_COOKIE => Some("session=xyz".to_string()),
            ENV_BASE_URL => Some("http://127.0.0.1:9000".to_string()),
            _ => None,
        });
        assert_eq!(config.cookie.as_deref(), Some("session=xyz"));
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let mut config = Config::default();
        config.apply_env(|_| Some("  ".to_string()));
        assert!(config.cookie.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_redacted_masks_cookie() {
        let config = Config {
            cookie: Some("secret".into()),
            ..Config::default()
        };
        let toml = config.redacted().to_toml().unwrap();
        assert!(!toml.contains("secret"));
        assert!(toml.contains("<redacted>"));
    }
}
