//! Catalog service client implementation.
//!
//! Uses `reqwest` for HTTP and caches read operations using `moka`.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shopfront_core::{NewProduct, Product, ProductId};
use tracing::{debug, instrument};
use url::Url;

use super::cache::{CacheKey, CacheValue};
use super::{AuthToken, Authenticator, CatalogError, LoginCredentials};
use crate::config::{StorefrontConfig, join_url};

/// Number of body characters kept in logs and error messages.
const BODY_PREVIEW_CHARS: usize = 500;

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the remote catalog and authentication service.
///
/// Cheaply cloneable. Product lists, single products and categories are
/// cached for the configured TTL.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

/// Request body for `POST /products`.
#[derive(Serialize)]
struct CreateProductRequest<'a> {
    title: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    description: &'a str,
    image: &'a str,
    category: &'a str,
}

/// Request body for `POST /auth/login`.
#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        Self::with_base_url(config.api_base_url.clone(), config.cache_ttl)
    }

    /// Create a client against an explicit base URL.
    #[must_use]
    pub fn with_base_url(base_url: Url, cache_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(cache_ttl)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url,
                cache,
            }),
        }
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Drop every cached response so the next read hits the network.
    pub fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.inner.base_url, path)
    }

    /// Send a request and return the body of a success response.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        resource: &str,
    ) -> Result<String, CatalogError> {
        let response = request.send().await?;
        let status = response.status();

        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        tracing::error!(
            status = %status,
            body = %preview(&body),
            "Catalog service returned non-success status"
        );
        Err(status_error(status.as_u16(), retry_after, &body, resource))
    }

    /// Send a request and parse the JSON body.
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        resource: &str,
    ) -> Result<T, CatalogError> {
        let body = self.send(request, resource).await?;
        parse_body(&body)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List every product, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a product list.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!(count = products.len(), "Cache hit for product list");
            return Ok(products.as_ref().clone());
        }

        let request = self.inner.client.get(self.url("/products"));
        let products: Vec<Product> = self.fetch(request, "products").await?;

        debug!(count = products.len(), "Fetched product list");
        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(Arc::new(products.clone())))
            .await;

        Ok(products)
    }

    /// Get a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the catalog has no such product,
    /// or another error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let cache_key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let request = self.inner.client.get(self.url(&format!("/products/{id}")));
        let body = self.send(request, &format!("product {id}")).await?;
        let product = parse_product_body(&body, id)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// List category names.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a string list.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<String>, CatalogError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories.as_ref().clone());
        }

        let request = self.inner.client.get(self.url("/products/categories"));
        let categories: Vec<String> = self.fetch(request, "categories").await?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(Arc::new(categories.clone())),
            )
            .await;

        Ok(categories)
    }

    /// Create a product and return the catalog's echo of it.
    ///
    /// The form is expected to have passed [`NewProduct::validate`] already.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects the product.
    #[instrument(skip(self, product), fields(title = %product.title))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, CatalogError> {
        let body = CreateProductRequest {
            title: product.title.trim(),
            price: product.price.amount(),
            description: product.description.trim(),
            image: product.image.trim(),
            category: &product.category,
        };

        let request = self.inner.client.post(self.url("/products")).json(&body);
        let created: Product = self.fetch(request, "product").await?;

        tracing::info!(product_id = %created.id, "Product created");
        Ok(created)
    }
}

impl Authenticator for CatalogClient {
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthToken, CatalogError> {
        let body = LoginRequest {
            username: &credentials.username,
            password: credentials.password.expose_secret(),
        };

        let request = self.inner.client.post(self.url("/auth/login")).json(&body);

        login_result(self.fetch::<AuthToken>(request, "login").await)
    }
}

/// Fold the ways the service rejects a login into `InvalidCredentials`.
///
/// An empty token counts as a rejection so a session can never be built
/// without one.
fn login_result(result: Result<AuthToken, CatalogError>) -> Result<AuthToken, CatalogError> {
    match result {
        Ok(token) if !token.token.is_empty() => Ok(token),
        Ok(_) => Err(CatalogError::InvalidCredentials),
        Err(CatalogError::Status { status, .. }) if matches!(status, 400 | 401 | 403) => {
            Err(CatalogError::InvalidCredentials)
        }
        Err(e) => Err(e),
    }
}

// =============================================================================
// Response Helpers
// =============================================================================

/// Map a non-success status to a `CatalogError`.
fn status_error(status: u16, retry_after: Option<u64>, body: &str, resource: &str) -> CatalogError {
    match status {
        404 => CatalogError::NotFound(resource.to_string()),
        429 => CatalogError::RateLimited(retry_after.unwrap_or(1)),
        _ => CatalogError::Status {
            status,
            message: preview(body),
        },
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %preview(body),
            "Failed to parse catalog response"
        );
        CatalogError::Parse(e)
    })
}

/// The catalog answers unknown product IDs with `200` and an empty body.
fn parse_product_body(body: &str, id: ProductId) -> Result<Product, CatalogError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(CatalogError::NotFound(format!("product {id}")));
    }
    parse_body(trimmed)
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
