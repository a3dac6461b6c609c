use anyhow::{Context, Result};

const DEFAULT_PORT: &str = "8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: &str = "120";
const DEFAULT_MAX_UPLOAD_BYTES: &str = "10485760";

/// Application configuration loaded from environment variables.
///
/// The Gemini key is optional here: a missing key is reported per optimization
/// call, so the rest of the session still works without one.
#[derive(Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub request_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY")
                .or_else(|| optional_env("VITE_GEMINI_API_KEY")),
            port: env_or("PORT", DEFAULT_PORT)
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config {
            gemini_api_key: Some("secret-key".to_string()),
            port: 8080,
            rust_log: "info".to_string(),
            request_timeout_secs: 120,
            max_upload_bytes: 1024,
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_defaults_parse() {
        assert_eq!(DEFAULT_PORT.parse::<u16>().unwrap(), 8080);
        assert_eq!(DEFAULT_MAX_UPLOAD_BYTES.parse::<usize>().unwrap(), 10 * 1024 * 1024);
    }
}
