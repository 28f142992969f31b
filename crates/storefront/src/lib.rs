//! Shopfront storefront library.
//!
//! Client-side state for a small online shop: a catalog client, the auth,
//! cart and wishlist stores with durable local persistence, a notification
//! queue and the product listing view-model.
//!
//! Everything hangs off [`AppState`], which is built once and passed to
//! consumers explicitly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod listing;
pub mod notifications;
pub mod pages;
pub mod state;
pub mod storage;
pub mod stores;

pub use error::{AppError, Result};
pub use state::{AppState, LoginOutcome};
