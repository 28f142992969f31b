//! Shopfront Core - Shared domain types.
//!
//! This crate provides the types shared by every shopfront component:
//! - `storefront` - Catalog client, client-side stores and listing derivation
//! - `cli` - Command-line driver over the storefront
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, products and the sign-in and create-product forms

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
