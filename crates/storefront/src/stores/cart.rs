//! Cart store: the products a shopper intends to buy, with quantities.
//!
//! # Invariants
//!
//! - At most one line per product ID.
//! - Every stored quantity is at least 1; setting a quantity of zero or less
//!   removes the line.
//! - Totals are computed from the current lines on every read.
//!
//! The full line list is persisted under [`CART_KEY`] after every mutation.
//! The add pulse is transient and never persisted.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shopfront_core::{Price, Product, ProductId};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::storage::{CART_KEY, Storage, load_record, save_record};

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Snapshot of the product taken when it was first added.
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Snapshotted unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Persisted cart record.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CartRecord {
    lines: Vec<CartLine>,
}

/// One-shot signal emitted by each [`CartStore::add_item`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    /// Increments by exactly one per add; 0 means no add yet.
    pub sequence: u64,
    /// True while the latest add is younger than the pulse window.
    pub active: bool,
}

/// Handle to the cart store. Clones share state.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    storage: Arc<dyn Storage>,
    pulse_window: Duration,
    state: RwLock<CartState>,
    pulses: watch::Sender<u64>,
}

struct CartState {
    lines: Vec<CartLine>,
    pulse_sequence: u64,
    last_added_at: Option<Instant>,
}

impl CartStore {
    /// Create the store and rehydrate it from `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, pulse_window: Duration) -> Self {
        let lines = load_lines(storage.as_ref());
        debug!(lines = lines.len(), "Cart rehydrated");

        let (pulses, _) = watch::channel(0);

        Self {
            inner: Arc::new(CartStoreInner {
                storage,
                pulse_window,
                state: RwLock::new(CartState {
                    lines,
                    pulse_sequence: 0,
                    last_added_at: None,
                }),
                pulses,
            }),
        }
    }

    /// Run a mutation under the write lock and persist the result.
    fn mutate<R>(&self, f: impl FnOnce(&mut CartState) -> R) -> R {
        let mut state = self.inner.state.write();
        let result = f(&mut state);
        self.save(&state.lines);
        result
    }

    fn save(&self, lines: &[CartLine]) {
        #[derive(Serialize)]
        struct CartRecordRef<'a> {
            lines: &'a [CartLine],
        }
        save_record(self.inner.storage.as_ref(), CART_KEY, &CartRecordRef { lines });
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of `product`, creating a line if needed.
    ///
    /// Emits exactly one pulse.
    pub fn add_item(&self, product: &Product) {
        let sequence = self.mutate(|state| {
            match state.lines.iter_mut().find(|l| l.product.id == product.id) {
                Some(line) => line.quantity = line.quantity.saturating_add(1),
                None => state.lines.push(CartLine {
                    product: product.clone(),
                    quantity: 1,
                }),
            }
            state.pulse_sequence += 1;
            state.last_added_at = Some(Instant::now());
            state.pulse_sequence
        });

        debug!(product_id = %product.id, sequence, "Added to cart");
        self.inner.pulses.send_replace(sequence);
    }

    /// Remove the line for `product_id`; no-op if absent.
    pub fn remove_item(&self, product_id: ProductId) {
        self.mutate(|state| state.lines.retain(|l| l.product.id != product_id));
    }

    /// Set a line's quantity exactly. Zero or negative removes the line.
    ///
    /// Updating a product that is not in the cart is a no-op.
    pub fn update_quantity(&self, product_id: ProductId, quantity: i64) {
        let Ok(quantity) = u32::try_from(quantity.max(0)) else {
            // Larger than u32::MAX
            self.set_quantity(product_id, u32::MAX);
            return;
        };

        if quantity == 0 {
            self.remove_item(product_id);
        } else {
            self.set_quantity(product_id, quantity);
        }
    }

    fn set_quantity(&self, product_id: ProductId, quantity: u32) {
        self.mutate(|state| {
            if let Some(line) = state.lines.iter_mut().find(|l| l.product.id == product_id) {
                line.quantity = quantity;
            }
        });
    }

    /// Remove every line.
    pub fn clear_cart(&self) {
        self.mutate(|state| state.lines.clear());
    }

    /// Checkout trigger. Logs the cart and leaves it unchanged.
    ///
    /// Returns the current total.
    pub fn checkout(&self) -> Price {
        let state = self.inner.state.read();
        let total = total_price(&state.lines);
        info!(
            items = total_items(&state.lines),
            total = %total,
            "Checkout requested"
        );
        total
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        total_items(&self.inner.state.read().lines)
    }

    /// Sum of snapshotted unit price times quantity over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        total_price(&self.inner.state.read().lines)
    }

    /// Snapshot of the lines, in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.inner.state.read().lines.clone()
    }

    /// The line for `product_id`, if any.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<CartLine> {
        self.inner
            .state
            .read()
            .lines
            .iter()
            .find(|l| l.product.id == product_id)
            .cloned()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.state.read().lines.is_empty()
    }

    /// The latest pulse and whether it is still inside the window.
    #[must_use]
    pub fn pulse(&self) -> Pulse {
        let state = self.inner.state.read();
        Pulse {
            sequence: state.pulse_sequence,
            active: state
                .last_added_at
                .is_some_and(|at| at.elapsed() < self.inner.pulse_window),
        }
    }

    /// Receive the pulse sequence each time an item is added.
    #[must_use]
    pub fn subscribe_pulses(&self) -> watch::Receiver<u64> {
        self.inner.pulses.subscribe()
    }
}

fn total_items(lines: &[CartLine]) -> u32 {
    lines.iter().fold(0u32, |acc, l| acc.saturating_add(l.quantity))
}

fn total_price(lines: &[CartLine]) -> Price {
    lines.iter().map(CartLine::line_total).sum()
}

/// Load persisted lines, dropping zero quantities and merging duplicate IDs.
fn load_lines(storage: &dyn Storage) -> Vec<CartLine> {
    let record: CartRecord = load_record(storage, CART_KEY).unwrap_or_default();

    let mut lines: Vec<CartLine> = Vec::with_capacity(record.lines.len());
    for line in record.lines.into_iter().filter(|l| l.quantity > 0) {
        match lines.iter_mut().find(|l| l.product.id == line.product.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => lines.push(line),
        }
    }
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn product(id: i32, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents),
            category: "electronics".to_string(),
            image: format!("https://example.com/{id}.png"),
            description: String::new(),
            rating: None,
        }
    }

    fn store() -> (CartStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = CartStore::new(storage.clone(), Duration::from_secs(60));
        (store, storage)
    }

    // =========================================================================
    // Add / Remove Tests
    // =========================================================================

    #[test]
    fn test_repeated_adds_increment_single_line() {
        let (cart, _) = store();
        let ids = [1, 2, 1, 3, 1, 2];
        let catalog = [product(1, 100), product(2, 200), product(3, 300)];

        for id in ids {
            let p = catalog.iter().find(|p| p.id.as_i32() == id).unwrap();
            cart.add_item(p);
        }

        let lines = cart.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity, 3);
        assert_eq!(cart.line(ProductId::new(2)).unwrap().quantity, 2);
        assert_eq!(cart.line(ProductId::new(3)).unwrap().quantity, 1);
        assert_eq!(cart.total_items(), 6);
    }

    #[test]
    fn test_remove_item_and_missing_noop() {
        let (cart, _) = store();
        cart.add_item(&product(1, 100));
        cart.remove_item(ProductId::new(99));
        assert_eq!(cart.lines().len(), 1);

        cart.remove_item(ProductId::new(1));
        assert!(cart.is_empty());
    }

    // =========================================================================
    // Quantity Tests
    // =========================================================================

    #[test]
    fn test_update_quantity_is_absolute() {
        let (cart, _) = store();
        cart.add_item(&product(1, 100));
        cart.update_quantity(ProductId::new(1), 5);
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity, 5);

        cart.update_quantity(ProductId::new(1), 2);
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity, 2);
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        for quantity in [0, -5] {
            let (cart, _) = store();
            cart.add_item(&product(1, 100));
            cart.add_item(&product(2, 100));
            cart.update_quantity(ProductId::new(1), quantity);

            assert!(cart.line(ProductId::new(1)).is_none());
            assert_eq!(cart.lines().len(), 1);
        }
    }

    #[test]
    fn test_update_quantity_unknown_product_is_noop() {
        let (cart, _) = store();
        cart.update_quantity(ProductId::new(8), 3);
        assert!(cart.is_empty());
    }

    // =========================================================================
    // Totals Tests
    // =========================================================================

    #[test]
    fn test_total_price_uses_snapshot() {
        let (cart, _) = store();
        let a = product(1, 1000);
        let b = product(2, 550);
        cart.add_item(&a);
        cart.add_item(&a);
        cart.add_item(&b);

        assert_eq!(cart.total_price(), Price::from_cents(2550));

        // A later catalog price change does not touch the existing line
        let repriced = Product {
            price: Price::from_cents(9999),
            ..a
        };
        cart.add_item(&repriced);
        assert_eq!(cart.total_price(), Price::from_cents(3550));
    }

    #[test]
    fn test_empty_cart_totals() {
        let (cart, _) = store();
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Price::zero());
    }

    #[test]
    fn test_checkout_leaves_cart_unchanged() {
        let (cart, _) = store();
        cart.add_item(&product(1, 250));
        assert_eq!(cart.checkout(), Price::from_cents(250));
        assert_eq!(cart.total_items(), 1);
    }

    // =========================================================================
    // Pulse Tests
    // =========================================================================

    #[test]
    fn test_each_add_emits_one_pulse() {
        let (cart, _) = store();
        assert_eq!(cart.pulse(), Pulse { sequence: 0, active: false });

        cart.add_item(&product(1, 100));
        cart.add_item(&product(1, 100));
        let pulse = cart.pulse();
        assert_eq!(pulse.sequence, 2);
        assert!(pulse.active);

        cart.remove_item(ProductId::new(1));
        assert_eq!(cart.pulse().sequence, 2);
    }

    #[test]
    fn test_pulse_clears_after_window() {
        let storage = Arc::new(MemoryStorage::new());
        let cart = CartStore::new(storage, Duration::ZERO);
        cart.add_item(&product(1, 100));

        let pulse = cart.pulse();
        assert_eq!(pulse.sequence, 1);
        assert!(!pulse.active);
    }

    #[tokio::test]
    async fn test_pulse_subscription_sees_adds() {
        let (cart, _) = store();
        let mut rx = cart.subscribe_pulses();

        cart.add_item(&product(1, 100));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);
    }

    // =========================================================================
    // Persistence Tests
    // =========================================================================

    #[test]
    fn test_lines_survive_restart() {
        let (cart, storage) = store();
        cart.add_item(&product(1, 1000));
        cart.add_item(&product(1, 1000));
        cart.add_item(&product(2, 550));
        let before = cart.lines();
        drop(cart);

        let restored = CartStore::new(storage, Duration::from_secs(60));
        assert_eq!(restored.lines(), before);
        assert_eq!(restored.pulse().sequence, 0);
    }

    #[test]
    fn test_clear_is_persisted() {
        let (cart, storage) = store();
        cart.add_item(&product(1, 100));
        cart.clear_cart();

        let restored = CartStore::new(storage, Duration::from_secs(60));
        assert!(restored.is_empty());
    }

    #[test]
    fn test_rehydration_repairs_invalid_lines() {
        let storage = Arc::new(MemoryStorage::new());
        let p = product(1, 100);
        save_record(
            storage.as_ref(),
            CART_KEY,
            &CartRecord {
                lines: vec![
                    CartLine { product: p.clone(), quantity: 2 },
                    CartLine { product: product(2, 100), quantity: 0 },
                    CartLine { product: p, quantity: 3 },
                ],
            },
        );

        let cart = CartStore::new(storage, Duration::from_secs(60));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity, 5);
    }
}
