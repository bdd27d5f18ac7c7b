use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct FrontendConfig {
    pub api_url: String,
    pub request_timeout: Duration,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl FrontendConfig {
    /// Reads `BLOGGER_API_URL` and `BLOGGER_HTTP_TIMEOUT_SECS`, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Result<Self> {
        let api_url = match env::var("BLOGGER_API_URL") {
            Ok(raw) if !raw.trim().is_empty() => normalize_api_url(&raw)?,
            _ => DEFAULT_API_URL.to_string(),
        };
        let request_timeout = env::var("BLOGGER_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        Ok(Self {
            api_url,
            request_timeout,
        })
    }

    pub fn with_api_url(mut self, api_url: &str) -> Result<Self> {
        self.api_url = normalize_api_url(api_url)?;
        Ok(self)
    }
}

/// Resource paths are appended to the API root (`{apiUrl}v1/posts`), so the
/// root always ends with exactly one slash.
pub fn normalize_api_url(raw: &str) -> Result<String> {
    let mut base = raw.trim().to_string();
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    while base.ends_with('/') {
        base.pop();
    }
    base.push('/');
    Url::parse(&base).with_context(|| format!("invalid API URL: {raw}"))?;
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_scheme_and_trailing_slash() {
        assert_eq!(
            normalize_api_url("localhost:8080").unwrap(),
            "http://localhost:8080/"
        );
    }

    #[test]
    fn collapses_repeated_trailing_slashes() {
        assert_eq!(
            normalize_api_url("https://blog.example.com/api///").unwrap(),
            "https://blog.example.com/api/"
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(normalize_api_url("http://exa mple.com").is_err());
    }

    #[test]
    fn with_api_url_keeps_timeout() {
        let config = FrontendConfig::default()
            .with_api_url("127.0.0.1:9000")
            .unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:9000/");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }
}
