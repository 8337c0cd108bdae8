//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `ETHOS_HOST` - Bind address (default: 127.0.0.1)
//! - `ETHOS_PORT` - Listen port (default: 3000)
//! - `ETHOS_BASE_URL` - Public URL (default: <http://localhost:3000>); `https://`
//!   turns on secure cookies
//! - `ETHOS_STATIC_DIR` - Directory served under `/static` (default: the crate's
//!   own `static/`)
//! - `ETHOS_CART_OPEN_DELAY_MS` - Delay before the cart drawer opens after an
//!   add (default: 200)
//! - `ETHOS_PAYMENT_DELAY_MS` - Simulated payment duration (default: 2000)
//! - `ETHOS_LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_CART_OPEN_DELAY_MS: u64 = 200;
const DEFAULT_PAYMENT_DELAY_MS: u64 = 2000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// How long after an add the drawer waits before opening
    pub cart_open_delay: Duration,
    /// How long the simulated payment takes
    pub payment_delay: Duration,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of requests traced as Sentry transactions
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            base_url: default_base_url(),
            static_dir: default_static_dir(),
            cart_open_delay: Duration::from_millis(DEFAULT_CART_OPEN_DELAY_MS),
            payment_delay: Duration::from_millis(DEFAULT_PAYMENT_DELAY_MS),
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        Ok(Self {
            host: parse_env_or("ETHOS_HOST", defaults.host)?,
            port: parse_env_or("ETHOS_PORT", defaults.port)?,
            base_url: parse_env_or("ETHOS_BASE_URL", defaults.base_url)?,
            static_dir: get_optional_env("ETHOS_STATIC_DIR")
                .map_or(defaults.static_dir, PathBuf::from),
            cart_open_delay: Duration::from_millis(parse_env_or(
                "ETHOS_CART_OPEN_DELAY_MS",
                DEFAULT_CART_OPEN_DELAY_MS,
            )?),
            payment_delay: Duration::from_millis(parse_env_or(
                "ETHOS_PAYMENT_DELAY_MS",
                DEFAULT_PAYMENT_DELAY_MS,
            )?),
            log_json: get_optional_env("ETHOS_LOG_FORMAT")
                .is_some_and(|format| format.trim().eq_ignore_ascii_case("json")),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_rate("SENTRY_SAMPLE_RATE", defaults.sentry_sample_rate)?,
            sentry_traces_sample_rate: parse_rate(
                "SENTRY_TRACES_SAMPLE_RATE",
                defaults.sentry_traces_sample_rate,
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies must be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }

    /// Cart drawer delay in whole milliseconds, as sent to the browser.
    #[must_use]
    pub fn cart_open_delay_ms(&self) -> u64 {
        u64::try_from(self.cart_open_delay.as_millis()).unwrap_or(u64::MAX)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

#[allow(clippy::expect_used)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a sample rate, which must lie in `0.0..=1.0`.
fn parse_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let rate = parse_env_or(key, default)?;
    check_rate(key, rate)
}

fn check_rate(key: &str, rate: f32) -> Result<f32, ConfigError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.cart_open_delay, Duration::from_millis(200));
        assert_eq!(config.payment_delay, Duration::from_secs(2));
        assert!(config.static_dir.ends_with("static"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "0.0.0.0".parse().unwrap(),
            port: 8080,
            ..StorefrontConfig::default()
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_is_secure_follows_scheme() {
        let mut config = StorefrontConfig::default();
        assert!(!config.is_secure());

        config.base_url = Url::parse("https://ethos.coffee").unwrap();
        assert!(config.is_secure());
    }

    #[test]
    fn test_cart_open_delay_ms() {
        let config = StorefrontConfig {
            cart_open_delay: Duration::from_millis(350),
            ..StorefrontConfig::default()
        };
        assert_eq!(config.cart_open_delay_ms(), 350);
    }

    #[test]
    fn test_parse_value_reports_variable() {
        let err = parse_value::<u16>("ETHOS_PORT", "seventy").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ETHOS_PORT"));
        assert!(err.to_string().starts_with("Invalid environment variable ETHOS_PORT"));
    }

    #[test]
    fn test_parse_value_trims_whitespace() {
        assert_eq!(parse_value::<u64>("ETHOS_PAYMENT_DELAY_MS", " 50 ").unwrap(), 50);
    }

    #[test]
    fn test_parse_value_rejects_bad_url() {
        assert!(parse_value::<Url>("ETHOS_BASE_URL", "not a url").is_err());
    }

    #[test]
    fn test_check_rate_bounds() {
        assert!(check_rate("SENTRY_SAMPLE_RATE", 0.0).is_ok());
        assert!(check_rate("SENTRY_SAMPLE_RATE", 1.0).is_ok());
        assert!(check_rate("SENTRY_SAMPLE_RATE", 1.5).is_err());
        assert!(check_rate("SENTRY_SAMPLE_RATE", -0.1).is_err());
    }
}
