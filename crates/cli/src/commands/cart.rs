//! Cart commands.

use shopfront_core::ProductId;
use shopfront_storefront::AppState;

use super::{CliError, fetch_product};

/// Print every line and the totals.
#[allow(clippy::print_stdout)]
pub fn show(state: &AppState) {
    let cart = state.cart();
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for line in cart.lines() {
        println!(
            "{:>4}  {:>3} x {:>9}  {:>10}  {}",
            line.product.id.as_i32(),
            line.quantity,
            line.product.price.display(),
            line.line_total().display(),
            line.product.title
        );
    }
    println!(
        "{} items, total {}",
        cart.total_items(),
        cart.total_price().display()
    );
}

/// Fetch a product and add one unit of it.
pub async fn add(state: &AppState, id: ProductId) -> Result<(), CliError> {
    let product = fetch_product(state, id).await?;
    state.add_to_cart(&product);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn remove(state: &AppState, id: ProductId) {
    if state.cart().line(id).is_none() {
        println!("Product {id} is not in the cart.");
    }
    state.cart().remove_item(id);
}

#[allow(clippy::print_stdout)]
pub fn set(state: &AppState, id: ProductId, quantity: i64) {
    if state.cart().line(id).is_none() {
        println!("Product {id} is not in the cart; add it first.");
        return;
    }
    state.cart().update_quantity(id, quantity);
}

#[allow(clippy::print_stdout)]
pub fn checkout(state: &AppState) {
    if state.cart().is_empty() {
        println!("Your cart is empty.");
        return;
    }
    let total = state.cart().checkout();
    println!("Checkout total: {}", total.display());
}
