//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `SHOPFRONT_API_BASE_URL` - Catalog service base URL (default: <https://fakestoreapi.com>)
//! - `SHOPFRONT_STORAGE_DIR` - Directory for persisted store records
//!   (default: platform data dir + `/shopfront`)
//! - `SHOPFRONT_PAGE_SIZE` - Products per listing page (default: 10)
//! - `SHOPFRONT_CACHE_TTL_SECS` - Catalog response cache TTL (default: 300)
//! - `SHOPFRONT_NOTIFICATION_MS` - How long a notification stays visible (default: 3000)
//! - `SHOPFRONT_PULSE_MS` - Length of the add-to-cart pulse window (default: 600)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://fakestoreapi.com";
pub const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_NOTIFICATION_MS: u64 = 3000;
const DEFAULT_PULSE_MS: u64 = 600;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the catalog/auth service
    pub api_base_url: Url,
    /// Directory holding the persisted auth, cart and wishlist records
    pub storage_dir: PathBuf,
    /// Products per listing page (always > 0)
    pub page_size: usize,
    /// Time-to-live for cached catalog reads
    pub cache_ttl: Duration,
    /// Display duration of a notification before it expires
    pub notification_duration: Duration,
    /// Window during which the cart's add pulse reads as active
    pub pulse_window: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            storage_dir: default_storage_dir(),
            page_size: DEFAULT_PAGE_SIZE,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            notification_duration: Duration::from_millis(DEFAULT_NOTIFICATION_MS),
            pulse_window: Duration::from_millis(DEFAULT_PULSE_MS),
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
    /// Returns `ConfigError` if a variable is set but cannot be parsed, or if
    /// the page size is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = match get_optional_env("SHOPFRONT_API_BASE_URL") {
            Some(raw) => Url::parse(&raw).map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPFRONT_API_BASE_URL".to_string(), e.to_string())
            })?,
            None => default_api_base_url(),
        };

        let storage_dir =
            get_optional_env("SHOPFRONT_STORAGE_DIR").map_or_else(default_storage_dir, PathBuf::from);

        let page_size: usize = get_parsed_or_default("SHOPFRONT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_PAGE_SIZE".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let cache_ttl = Duration::from_secs(get_parsed_or_default(
            "SHOPFRONT_CACHE_TTL_SECS",
            DEFAULT_CACHE_TTL_SECS,
        )?);
        let notification_duration = Duration::from_millis(get_parsed_or_default(
            "SHOPFRONT_NOTIFICATION_MS",
            DEFAULT_NOTIFICATION_MS,
        )?);
        let pulse_window =
            Duration::from_millis(get_parsed_or_default("SHOPFRONT_PULSE_MS", DEFAULT_PULSE_MS)?);

        Ok(Self {
            api_base_url,
            storage_dir,
            page_size,
            cache_ttl,
            notification_duration,
            pulse_window,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Join a base URL and an absolute path without doubling the slash.
pub(crate) fn join_url(base: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn default_api_base_url() -> Url {
    Url::parse(DEFAULT_API_BASE_URL).expect("default API base URL is a valid absolute URL")
}

/// Platform data directory, falling back to `./.shopfront`.
fn default_storage_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".shopfront"), |dir| dir.join("shopfront"))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable, falling back to `default` when unset.
fn get_parsed_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = StorefrontConfig::default();
        assert_eq!(config.api_base_url.as_str(), "https://fakestoreapi.com/");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.notification_duration, Duration::from_millis(3000));
        assert!(config.storage_dir.ends_with("shopfront") || config.storage_dir.ends_with(".shopfront"));
    }

    #[test]
    fn test_join_url_without_double_slash() {
        let base = default_api_base_url();
        assert_eq!(join_url(&base, "/products"), "https://fakestoreapi.com/products");
        assert_eq!(
            join_url(&base, "products/categories"),
            "https://fakestoreapi.com/products/categories"
        );
    }

    #[test]
    fn test_join_url_keeps_base_path() {
        let base = Url::parse("http://localhost:8080/api/").unwrap();
        assert_eq!(join_url(&base, "/auth/login"), "http://localhost:8080/api/auth/login");
    }

    #[test]
    fn test_parsed_or_default_uses_default_when_unset() {
        let value: u64 = get_parsed_or_default("SHOPFRONT_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
