//! Wishlist store: an insertion-ordered set of liked products keyed by ID.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shopfront_core::{Product, ProductId};
use tracing::debug;

use crate::storage::{Storage, WISHLIST_KEY, load_record, save_record};

#[derive(Debug, Default, Serialize, Deserialize)]
struct WishlistRecord {
    items: Vec<Product>,
}

/// Handle to the wishlist store. Clones share state.
#[derive(Clone)]
pub struct WishlistStore {
    inner: Arc<WishlistStoreInner>,
}

struct WishlistStoreInner {
    storage: Arc<dyn Storage>,
    items: RwLock<Vec<Product>>,
}

impl WishlistStore {
    /// Create the store and rehydrate it from `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let record: WishlistRecord = load_record(storage.as_ref(), WISHLIST_KEY).unwrap_or_default();

        // Keep the first entry for any duplicated ID
        let mut items: Vec<Product> = Vec::with_capacity(record.items.len());
        for product in record.items {
            if !items.iter().any(|p| p.id == product.id) {
                items.push(product);
            }
        }
        debug!(items = items.len(), "Wishlist rehydrated");

        Self {
            inner: Arc::new(WishlistStoreInner {
                storage,
                items: RwLock::new(items),
            }),
        }
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut Vec<Product>) -> R) -> R {
        #[derive(Serialize)]
        struct WishlistRecordRef<'a> {
            items: &'a [Product],
        }

        let mut items = self.inner.items.write();
        let result = f(&mut items);
        save_record(
            self.inner.storage.as_ref(),
            WISHLIST_KEY,
            &WishlistRecordRef { items: &items },
        );
        result
    }

    /// Add `product` unless an entry with its ID already exists.
    pub fn add_item(&self, product: &Product) {
        self.mutate(|items| {
            if !items.iter().any(|p| p.id == product.id) {
                items.push(product.clone());
            }
        });
    }

    /// Remove the entry for `product_id`; no-op if absent.
    pub fn remove_item(&self, product_id: ProductId) {
        self.mutate(|items| items.retain(|p| p.id != product_id));
    }

    /// Remove `product` if present, add it otherwise.
    ///
    /// Returns `true` if the product was added. The membership check and the
    /// mutation happen under one write lock.
    pub fn toggle_item(&self, product: &Product) -> bool {
        let added = self.mutate(|items| {
            if let Some(index) = items.iter().position(|p| p.id == product.id) {
                items.remove(index);
                false
            } else {
                items.push(product.clone());
                true
            }
        });
        debug!(product_id = %product.id, added, "Wishlist toggled");
        added
    }

    #[must_use]
    pub fn is_in_wishlist(&self, product_id: ProductId) -> bool {
        self.inner.items.read().iter().any(|p| p.id == product_id)
    }

    /// Snapshot of the entries, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<Product> {
        self.inner.items.read().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.items.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.items.read().is_empty()
    }
}
