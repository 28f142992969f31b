//! Integration tests for shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! None of the tests need the real catalog service. Tests that exercise a
//! network failure point the client at a local port nothing listens on.
//!
//! # Test Categories
//!
//! - `persistence` - Store records surviving a restart
//! - `storefront_flow` - Cross-store interactions through `AppState`
//! - `listing` - Listing view-model properties

use std::path::Path;
use std::time::Duration;

use shopfront_core::{Price, Product, ProductId, Rating};
use shopfront_storefront::AppState;
use shopfront_storefront::config::StorefrontConfig;
use shopfront_storefront::storage::{AUTH_KEY, FileStorage, Storage};
use tempfile::TempDir;
use url::Url;

/// Address that refuses connections, for failure-path tests.
pub const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:9/";

/// A storage directory that lives as long as the context.
pub struct TestContext {
    pub dir: TempDir,
    pub config: StorefrontConfig,
}

impl TestContext {
    /// Create a fresh, empty storage directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = StorefrontConfig {
            api_base_url: Url::parse(UNREACHABLE_BASE_URL).expect("valid URL"),
            storage_dir: dir.path().join("shopfront"),
            pulse_window: Duration::from_secs(60),
            ..StorefrontConfig::default()
        };
        Self { dir, config }
    }

    /// Start (or restart) the application over this context's directory.
    ///
    /// # Panics
    ///
    /// Panics if the storage directory cannot be opened.
    #[must_use]
    pub fn start(&self) -> AppState {
        AppState::open(self.config.clone()).expect("open app state")
    }

    #[must_use]
    pub fn storage_dir(&self) -> &Path {
        &self.config.storage_dir
    }

    /// Write a signed-in session record, as a previous run would have.
    ///
    /// # Panics
    ///
    /// Panics if the record cannot be written.
    pub fn seed_session(&self, username: &str, token: &str) {
        let storage = FileStorage::open(self.storage_dir()).expect("open storage");
        let record = serde_json::json!({
            "state": {
                "token": token,
                "username": username,
                "isAuthenticated": true,
            },
            "version": 0,
        });
        storage
            .write(AUTH_KEY, &record.to_string())
            .expect("write session");
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A catalog product with a price in cents.
#[must_use]
pub fn product(id: i32, category: &str, cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        price: Price::from_cents(cents),
        category: category.to_string(),
        image: format!("https://fakestoreapi.com/img/{id}.jpg"),
        description: format!("Description of product {id}"),
        rating: Some(Rating {
            rate: 4.1,
            count: 259,
        }),
    }
}
