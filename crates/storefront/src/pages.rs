//! Page-level async flows.
//!
//! These turn catalog results into the three states a page can render:
//! loaded, not found, or failed. A failure records whether retrying may help;
//! retrying means calling the same loader again, usually after
//! [`CatalogClient::invalidate_all`].

use shopfront_core::{NewProduct, Product, ProductFormErrors, ProductId};
use tracing::{instrument, warn};

use crate::catalog::{Authenticator, CatalogClient, CatalogError};
use crate::notifications::NotificationKind;
use crate::state::AppState;

/// Outcome of a page load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loaded(T),
    /// The requested resource does not exist.
    NotFound,
    /// Any other failure. `retryable` is set when the same request may
    /// succeed later (transport errors, rate limits, server errors).
    Failed { message: String, retryable: bool },
}

impl<T> LoadState<T> {
    fn from_result(result: Result<T, CatalogError>) -> Self {
        match result {
            Ok(value) => Self::Loaded(value),
            Err(CatalogError::NotFound(resource)) => {
                warn!(resource = %resource, "Catalog resource not found");
                Self::NotFound
            }
            Err(e) => {
                let retryable = e.is_retryable();
                warn!(error = %e, retryable, "Catalog load failed");
                Self::Failed {
                    message: e.to_string(),
                    retryable,
                }
            }
        }
    }
}

/// Everything the listing page needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub categories: Vec<String>,
}

/// Fetch products and categories concurrently.
///
/// Either fetch failing fails the whole load.
#[instrument(skip(client))]
pub async fn load_catalog(client: &CatalogClient) -> LoadState<Catalog> {
    let result = tokio::try_join!(client.list_products(), client.list_categories())
        .map(|(products, categories)| Catalog {
            products,
            categories,
        });
    LoadState::from_result(result)
}

/// Fetch a single product for its details page.
#[instrument(skip(client))]
pub async fn load_product(client: &CatalogClient, id: ProductId) -> LoadState<Product> {
    LoadState::from_result(client.get_product(id).await)
}

/// Result of submitting the create-product form.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// No signed-in session. Nothing was validated or sent.
    Unauthorized,
    /// The form failed validation. Nothing was sent.
    Invalid(ProductFormErrors),
    /// The catalog accepted the product.
    Created(Product),
    /// The catalog call failed.
    Failed(String),
}

/// Gate on the session, validate, then submit the form.
///
/// Success and failure of the submission each enqueue a notification.
#[instrument(skip(state, form), fields(title = %form.title))]
pub async fn create_product<A: Authenticator>(
    state: &AppState<A>,
    form: NewProduct,
) -> CreateOutcome {
    if !state.auth().is_authenticated() {
        return CreateOutcome::Unauthorized;
    }

    if let Err(errors) = form.validate() {
        return CreateOutcome::Invalid(errors);
    }

    match state.catalog().create_product(&form).await {
        Ok(product) => {
            state
                .notifications()
                .enqueue("Product created successfully!", NotificationKind::Success);
            CreateOutcome::Created(product)
        }
        Err(e) => {
            warn!(error = %e, "Create product failed");
            let message = e.to_string();
            state
                .notifications()
                .enqueue(message.clone(), NotificationKind::Error);
            CreateOutcome::Failed(message)
        }
    }
}
