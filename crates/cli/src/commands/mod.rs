//! Command implementations.
//!
//! Commands print results to stdout. Anything diagnostic goes through
//! `tracing` to stderr.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod wishlist;

use shopfront_core::{Product, ProductId};
use shopfront_storefront::AppError;
use shopfront_storefront::AppState;
use shopfront_storefront::pages::{self, LoadState};
use thiserror::Error;

/// Errors that end a command with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    /// A page load or login failed; the message is the catalog's.
    #[error("{0}")]
    Failed(String),

    /// A page load failed in a way that may clear up if run again.
    #[error("{0} (temporary failure, try again)")]
    Retryable(String),
}

/// Turn a page load into a value or a command error.
pub fn loaded<T>(state: LoadState<T>, what: &str) -> Result<T, CliError> {
    match state {
        LoadState::Loaded(value) => Ok(value),
        LoadState::NotFound => Err(AppError::NotFound(what.to_string()).into()),
        LoadState::Failed {
            message,
            retryable: true,
        } => Err(CliError::Retryable(message)),
        LoadState::Failed { message, .. } => Err(CliError::Failed(message)),
    }
}

/// Fetch a product by ID, failing the command if it cannot be loaded.
pub async fn fetch_product(state: &AppState, id: ProductId) -> Result<Product, CliError> {
    loaded(
        pages::load_product(state.catalog(), id).await,
        &format!("product {id}"),
    )
}

/// Print and remove every pending notification.
#[allow(clippy::print_stdout)]
pub fn print_notifications(state: &AppState) {
    for notification in state.notifications().drain() {
        println!("[{}] {}", notification.kind.as_str(), notification.message);
    }
}
