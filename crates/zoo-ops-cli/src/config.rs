//! Environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use zoo_ops_core::api::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub prefs_path: PathBuf,
    pub http_timeout: Duration,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("ZOO_API_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let prefs_path = lookup("ZOO_PREFS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_prefs_path);
        let timeout_secs = lookup("ZOO_HTTP_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let log_format = match lookup("ZOO_LOG_FORMAT") {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        Self {
            api_url,
            prefs_path,
            http_timeout: Duration::from_secs(timeout_secs),
            log_format,
        }
    }
}

fn default_prefs_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("zoo-ops")
        .join("preferences.sqlite")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.prefs_path.ends_with("zoo-ops/preferences.sqlite"));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("ZOO_API_URL", "https://zoo.example.org"),
            ("ZOO_PREFS_PATH", "/tmp/prefs.sqlite"),
            ("ZOO_HTTP_TIMEOUT_SECS", "5"),
            ("ZOO_LOG_FORMAT", "JSON"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_url, "https://zoo.example.org");
        assert_eq!(config.prefs_path, PathBuf::from("/tmp/prefs.sqlite"));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_bad_timeout_falls_back() {
        let config = Config::from_lookup(|k| (k == "ZOO_HTTP_TIMEOUT_SECS").then(|| "soon".to_string()));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }
}
