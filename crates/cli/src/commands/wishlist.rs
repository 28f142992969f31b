//! Wishlist commands.

use shopfront_core::ProductId;
use shopfront_storefront::AppState;

use super::{CliError, fetch_product};

#[allow(clippy::print_stdout)]
pub fn show(state: &AppState) {
    let items = state.wishlist().items();
    if items.is_empty() {
        println!("Your wishlist is empty.");
        return;
    }

    for product in items {
        println!(
            "{:>4}  {:>9}  {}",
            product.id.as_i32(),
            product.price.display(),
            product.title
        );
    }
}

pub async fn toggle(state: &AppState, id: ProductId) -> Result<(), CliError> {
    let product = fetch_product(state, id).await?;
    state.toggle_wishlist(&product);
    Ok(())
}

/// Add without toggling; already-present products are left alone.
pub async fn add(state: &AppState, id: ProductId) -> Result<(), CliError> {
    if state.wishlist().is_in_wishlist(id) {
        return Ok(());
    }
    let product = fetch_product(state, id).await?;
    state.wishlist().add_item(&product);
    Ok(())
}
