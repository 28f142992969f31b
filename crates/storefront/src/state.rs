//! Application state shared across the storefront.
//!
//! `AppState` owns one instance of each store, the catalog client, the storage
//! backend and the configuration. It also hosts the cross-store interactions
//! (add to cart + notify, and so on). Each one is two independent atomic steps
//! with no transaction spanning both stores.

use std::sync::Arc;

use shopfront_core::{LoginForm, LoginFormErrors, Product};
use tracing::info;

use crate::catalog::{Authenticator, CatalogClient};
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::notifications::{NotificationKind, NotificationQueue};
use crate::storage::{FileStorage, MemoryStorage, Storage};
use crate::stores::{AuthStore, CartStore, WishlistStore};

/// Application state shared across all consumers.
///
/// This struct is cheaply cloneable via `Arc`; clones share every store.
/// The authenticator defaults to the catalog client.
pub struct AppState<A: Authenticator = CatalogClient> {
    inner: Arc<AppStateInner<A>>,
}

impl<A: Authenticator> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct AppStateInner<A: Authenticator> {
    config: StorefrontConfig,
    catalog: CatalogClient,
    storage: Arc<dyn Storage>,
    auth: AuthStore<A>,
    cart: CartStore,
    wishlist: WishlistStore,
    notifications: NotificationQueue,
}

/// Result of submitting the sign-in form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A field was blank. The auth store was not called.
    Invalid(LoginFormErrors),
    /// The session is now signed in.
    SignedIn,
    /// The service refused or failed; the auth store's error holds the message.
    Rejected,
}

impl AppState {
    /// Build the state over an explicit storage backend, rehydrating every
    /// persisted store from it.
    #[must_use]
    pub fn new(config: StorefrontConfig, storage: Arc<dyn Storage>) -> Self {
        let catalog = CatalogClient::new(&config);
        Self::assemble(config, storage, catalog.clone(), catalog)
    }

    /// Build the state with records kept in `config.storage_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be created.
    pub fn open(config: StorefrontConfig) -> Result<Self> {
        let storage = FileStorage::open(&config.storage_dir)?;
        info!(dir = %storage.dir().display(), "Using file storage");
        Ok(Self::new(config, Arc::new(storage)))
    }

    /// Build the state with in-memory storage that is lost on exit.
    #[must_use]
    pub fn ephemeral(config: StorefrontConfig) -> Self {
        Self::new(config, Arc::new(MemoryStorage::new()))
    }
}

impl<A: Authenticator> AppState<A> {
    /// Build the state with a custom authenticator for the auth store.
    ///
    /// Catalog reads still go through a [`CatalogClient`] built from `config`.
    #[must_use]
    pub fn with_authenticator(
        config: StorefrontConfig,
        storage: Arc<dyn Storage>,
        authenticator: A,
    ) -> Self {
        let catalog = CatalogClient::new(&config);
        Self::assemble(config, storage, catalog, authenticator)
    }

    fn assemble(
        config: StorefrontConfig,
        storage: Arc<dyn Storage>,
        catalog: CatalogClient,
        authenticator: A,
    ) -> Self {
        let auth = AuthStore::new(authenticator, Arc::clone(&storage));
        let cart = CartStore::new(Arc::clone(&storage), config.pulse_window);
        let wishlist = WishlistStore::new(Arc::clone(&storage));
        let notifications = NotificationQueue::new(config.notification_duration);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                storage,
                auth,
                cart,
                wishlist,
                notifications,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog service client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.inner.storage
    }

    #[must_use]
    pub fn auth(&self) -> &AuthStore<A> {
        &self.inner.auth
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    #[must_use]
    pub fn wishlist(&self) -> &WishlistStore {
        &self.inner.wishlist
    }

    #[must_use]
    pub fn notifications(&self) -> &NotificationQueue {
        &self.inner.notifications
    }

    // =========================================================================
    // Cross-store interactions
    // =========================================================================

    /// Add one unit of `product` to the cart and announce it.
    pub fn add_to_cart(&self, product: &Product) {
        self.inner.cart.add_item(product);
        self.inner
            .notifications
            .enqueue(format!("Added {} to cart", product.title), NotificationKind::Cart);
    }

    /// Toggle `product` in the wishlist and announce the result.
    ///
    /// Returns `true` if the product was added.
    pub fn toggle_wishlist(&self, product: &Product) -> bool {
        let added = self.inner.wishlist.toggle_item(product);
        let message = if added {
            "Added to wishlist"
        } else {
            "Removed from wishlist"
        };
        self.inner
            .notifications
            .enqueue(message, NotificationKind::Wishlist);
        added
    }

    /// Submit the sign-in form and greet the user on success.
    ///
    /// The previous banner error is cleared first. A blank field stops here
    /// with per-field messages; a failed login enqueues nothing, since the
    /// auth store's error is the message.
    pub async fn login(&self, form: &LoginForm) -> LoginOutcome {
        self.inner.auth.clear_error();
        if let Err(errors) = form.validate() {
            return LoginOutcome::Invalid(errors);
        }

        if !self.inner.auth.login(&form.username, &form.password).await {
            return LoginOutcome::Rejected;
        }

        let name = self.inner.auth.username().unwrap_or_default();
        self.inner
            .notifications
            .enqueue(format!("Welcome back, {name}!"), NotificationKind::Success);
        LoginOutcome::SignedIn
    }

    /// Sign out and confirm it.
    pub fn logout(&self) {
        self.inner.auth.logout();
        self.inner
            .notifications
            .enqueue("Signed out", NotificationKind::Success);
    }
}
