use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_DOCUMENT_BYTES: usize = 256 * 1024;
const DEFAULT_TEST_TIME_LIMIT_SECS: u64 = 90 * 60;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on a test document accepted for segmenting or storage.
    pub max_document_bytes: usize,
    /// Time a candidate has from receiving a test, used for the countdown.
    pub test_time_limit_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            rust_log: "info".to_string(),
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            test_time_limit_secs: DEFAULT_TEST_TIME_LIMIT_SECS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", DEFAULT_PORT).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_document_bytes: parse_env("MAX_DOCUMENT_BYTES", DEFAULT_MAX_DOCUMENT_BYTES)
                .context("MAX_DOCUMENT_BYTES must be a byte count")?,
            test_time_limit_secs: parse_env("TEST_TIME_LIMIT_SECS", DEFAULT_TEST_TIME_LIMIT_SECS)
                .context("TEST_TIME_LIMIT_SECS must be a number of seconds")?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
