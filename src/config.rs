use anyhow::{Context, Result};
use std::time::Duration;

/// Endpoints used by the locale checks.
#[derive(Debug, Clone)]
pub struct Config {
    // Pontoon
    pub pontoon_url: String,

    // GitHub
    pub github_api_url: String,
    pub github_token: Option<String>,

    // HTTP
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let http_timeout_secs = match std::env::var("HTTP_TIMEOUT_SECS") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("HTTP_TIMEOUT_SECS is not a number: {}", value))?,
            Err(_) => 10,
        };

        Ok(Self {
            pontoon_url: std::env::var("PONTOON_URL")
                .unwrap_or_else(|_| "https://pontoon.mozilla.org".to_string()),

            github_api_url: std::env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| "https://api.github.com".to_string()),
            github_token: std::env::var("GITHUB_TOKEN")
                .ok()
                .filter(|token| !token.is_empty()),

            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = [
        "PONTOON_URL",
        "GITHUB_API_URL",
        "GITHUB_TOKEN",
        "HTTP_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.pontoon_url, "https://pontoon.mozilla.org");
        assert_eq!(config.github_api_url, "https://api.github.com");
        assert_eq!(config.github_token, None);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("PONTOON_URL", "http://localhost:8000");
        std::env::set_var("GITHUB_TOKEN", "secret");
        std::env::set_var("HTTP_TIMEOUT_SECS", "3");

        let config = Config::from_env().unwrap();
        assert_eq!(config.pontoon_url, "http://localhost:8000");
        assert_eq!(config.github_token.as_deref(), Some("secret"));
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_token_ignored() {
        clear_env();
        std::env::set_var("GITHUB_TOKEN", "");
        assert_eq!(Config::from_env().unwrap().github_token, None);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_timeout() {
        clear_env();
        std::env::set_var("HTTP_TIMEOUT_SECS", "soon");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("HTTP_TIMEOUT_SECS"));
        clear_env();
    }
}
