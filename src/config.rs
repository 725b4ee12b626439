use crate::error::ConfigError;
use crate::filter::UrlFilterConfig;
use crate::naming::DEFAULT_OUTPUT_DIR;
use crate::readiness::{
    DEFAULT_IDLE_WINDOW_MS, DEFAULT_MAX_INFLIGHT, DEFAULT_NAVIGATION_TIMEOUT_SECS,
    DEFAULT_POLL_INTERVAL_MS, NetworkIdle, ReadinessPolicy,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the WebDriver URL
pub const WEBDRIVER_URL_ENV: &str = "WEBDRIVER_URL";

/// Configuration for a screenshot crawl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Root directory for screenshot folders
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Path to the browser executable (WebDriver default if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_binary: Option<String>,

    /// Maximum time for a navigation to become ready, in seconds
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,

    /// Wait for network-idle instead of just the load event
    #[serde(default = "default_wait_for_network_idle")]
    pub wait_for_network_idle: bool,

    /// Quiet period that counts as network-idle, in milliseconds
    #[serde(default = "default_idle_window_ms")]
    pub idle_window_ms: u64,

    /// Interval between network activity checks, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Requests that may stay open on a page that counts as network-idle
    #[serde(default = "default_max_inflight")]
    pub max_inflight: u64,

    /// Stop after this many distinct pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,

    /// Capture the seed page during bootstrap and again on the first crawl step
    #[serde(default = "default_recapture_seed")]
    pub recapture_seed: bool,

    /// Restrictions on which links are followed
    #[serde(default)]
    pub filter: UrlFilterConfig,
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_headless() -> bool {
    true
}

fn default_navigation_timeout_secs() -> u64 {
    DEFAULT_NAVIGATION_TIMEOUT_SECS
}

fn default_wait_for_network_idle() -> bool {
    true
}

fn default_idle_window_ms() -> u64 {
    DEFAULT_IDLE_WINDOW_MS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_max_inflight() -> u64 {
    DEFAULT_MAX_INFLIGHT
}

fn default_recapture_seed() -> bool {
    true
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            output_dir: default_output_dir(),
            headless: default_headless(),
            browser_binary: None,
            navigation_timeout_secs: default_navigation_timeout_secs(),
            wait_for_network_idle: default_wait_for_network_idle(),
            idle_window_ms: default_idle_window_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            max_inflight: default_max_inflight(),
            max_pages: None,
            recapture_seed: default_recapture_seed(),
            filter: UrlFilterConfig::default(),
        }
    }
}

impl CrawlConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Override the WebDriver URL with an environment variable if provided
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var(WEBDRIVER_URL_ENV) {
            self.apply_webdriver_override(&webdriver_url);
        }
    }

    fn apply_webdriver_override(&mut self, webdriver_url: &str) {
        if !webdriver_url.is_empty() {
            ::log::debug!("Using WebDriver URL override {}", webdriver_url);
            self.webdriver_url = webdriver_url.to_string();
        }
    }

    /// How navigations decide they are complete
    pub fn readiness(&self) -> ReadinessPolicy {
        let timeout = Duration::from_secs(self.navigation_timeout_secs);
        if self.wait_for_network_idle {
            ReadinessPolicy::NetworkIdle {
                idle: NetworkIdle {
                    idle_window: Duration::from_millis(self.idle_window_ms),
                    poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
                    max_inflight: self.max_inflight,
                },
                timeout,
            }
        } else {
            ReadinessPolicy::Load { timeout }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = CrawlConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CrawlConfig::default());
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert_eq!(config.output_dir, PathBuf::from("screenshots"));
        assert!(config.recapture_seed);
        assert_eq!(config.readiness(), ReadinessPolicy::default());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "webdriver_url": "http://localhost:9515",
            "max_pages": 25,
            "wait_for_network_idle": false,
            "navigation_timeout_secs": 10,
            "filter": { "same_host_only": true, "exclude_patterns": ["\\.pdf$"] }
        }"#;
        let config = CrawlConfig::from_json_str(json).unwrap();
        assert_eq!(config.webdriver_url, "http://localhost:9515");
        assert_eq!(config.max_pages, Some(25));
        assert!(config.filter.same_host_only);
        assert_eq!(config.filter.exclude_patterns, vec![r"\.pdf$".to_string()]);
        assert_eq!(
            config.readiness(),
            ReadinessPolicy::Load {
                timeout: Duration::from_secs(10)
            }
        );
    }

    #[test]
    fn test_network_idle_settings() {
        let json = r#"{ "idle_window_ms": 750, "poll_interval_ms": 0, "max_inflight": 2 }"#;
        let config = CrawlConfig::from_json_str(json).unwrap();
        match config.readiness() {
            ReadinessPolicy::NetworkIdle { idle, timeout } => {
                assert_eq!(idle.idle_window, Duration::from_millis(750));
                assert_eq!(idle.poll_interval, Duration::from_millis(1));
                assert_eq!(idle.max_inflight, 2);
                assert_eq!(timeout, Duration::from_secs(30));
            }
            other => panic!("unexpected policy {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            CrawlConfig::from_json_str("{ \"max_pages\": \"many\" }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crawl.json");
        std::fs::write(&path, r#"{ "output_dir": "shots", "headless": false }"#).unwrap();

        let config = CrawlConfig::from_file(&path).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("shots"));
        assert!(!config.headless);

        let missing = CrawlConfig::from_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_webdriver_override() {
        let mut config = CrawlConfig::default();
        config.apply_webdriver_override("");
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        config.apply_webdriver_override("http://127.0.0.1:9515");
        assert_eq!(config.webdriver_url, "http://127.0.0.1:9515");
    }
}
