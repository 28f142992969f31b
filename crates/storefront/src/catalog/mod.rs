//! Catalog and authentication service client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`
//! - The remote catalog is the source of truth - products are fetched, never synced
//! - In-memory caching via `moka` for read operations (5 minute TTL by default)
//!
//! # Operations
//!
//! | Operation | Endpoint |
//! |---|---|
//! | list products | `GET /products` |
//! | get product | `GET /products/{id}` |
//! | list categories | `GET /products/categories` |
//! | create product | `POST /products` |
//! | authenticate | `POST /auth/login` |
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config);
//! let products = client.list_products().await?;
//! let product = client.get_product(ProductId::new(1)).await?;
//! ```

mod cache;
mod client;
#[cfg(test)]
pub(crate) mod testing;

pub use client::CatalogClient;

use std::future::Future;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection refused, DNS, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The authenticate operation rejected the credentials.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Rate limited by the catalog service.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success response.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        message: String,
    },
}

impl CatalogError {
    /// Whether re-issuing the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimited(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Parse(_) | Self::NotFound(_) | Self::InvalidCredentials => false,
        }
    }
}

/// Username and password submitted to the authenticate operation.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct LoginCredentials {
    pub username: String,
    pub password: SecretString,
}

impl LoginCredentials {
    /// Create credentials from a username and plain password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Token returned by a successful authenticate call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthToken {
    pub token: String,
}

/// The authenticate operation, as consumed by the auth store.
///
/// [`CatalogClient`] is the production implementation.
pub trait Authenticator: Send + Sync + 'static {
    /// Exchange credentials for a session token.
    fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> impl Future<Output = Result<AuthToken, CatalogError>> + Send;
}
