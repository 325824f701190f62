//! Client configuration.
//!
//! Configuration is resolved from:
//! 1. Default values
//! 2. Environment variables (`ATLAS_*` prefix)
//!
//! Environment variables take precedence over defaults; empty values are
//! treated as unset.

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable prefix
const ENV_PREFIX: &str = "ATLAS";

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings shared by the transport and the durable stores.
///
/// # Examples
///
/// ```rust
/// use atlas::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_base_url("https://atlas.example.com/api/v1/")
///     .with_timeout(Duration::from_secs(10));
///
/// assert_eq!(config.base_url, "https://atlas.example.com/api/v1");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root every request path is appended to, without trailing slash
    pub base_url: String,

    /// Directory for persisted store state
    pub state_dir: PathBuf,

    /// Per-request timeout
    pub timeout: Duration,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            state_dir: default_state_dir(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("atlas/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Defaults with `ATLAS_API_BASE_URL`, `ATLAS_STATE_DIR` and
    /// `ATLAS_TIMEOUT_SECS` applied on top.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok());
        config
    }

    /// Applies overrides from any variable lookup.
    ///
    /// `from_env` passes the process environment; tests pass a map.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| {
            lookup(&format!("{}_{}", ENV_PREFIX, suffix)).filter(|v| !v.trim().is_empty())
        };

        if let Some(val) = var("API_BASE_URL") {
            self.base_url = trim_base_url(&val);
        }

        if let Some(val) = var("STATE_DIR") {
            self.state_dir = PathBuf::from(val);
        }

        if let Some(secs) = var("TIMEOUT_SECS").and_then(|v| v.trim().parse::<u64>().ok()) {
            self.timeout = Duration::from_secs(secs);
        }
    }

    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = trim_base_url(base_url.as_ref());
        self
    }

    pub fn with_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("atlas")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.state_dir.ends_with("atlas"));
        assert!(config.user_agent.starts_with("atlas/"));
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = ClientConfig::default();
        config.apply_overrides(lookup(&[
            ("ATLAS_API_BASE_URL", "https://api.example.com/v1/"),
            ("ATLAS_STATE_DIR", "/tmp/atlas-state"),
            ("ATLAS_TIMEOUT_SECS", "5"),
        ]));

        assert_eq!(config.base_url, "https://api.example.com/v1");
        assert_eq!(config.state_dir, PathBuf::from("/tmp/atlas-state"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_empty_and_invalid_overrides_ignored() {
        let mut config = ClientConfig::default();
        config.apply_overrides(lookup(&[
            ("ATLAS_API_BASE_URL", "  "),
            ("ATLAS_TIMEOUT_SECS", "soon"),
        ]));

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
