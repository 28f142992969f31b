//! Core types for shopfront.
//!
//! This module provides type-safe wrappers for catalog domain concepts.

pub mod id;
pub mod login_form;
pub mod new_product;
pub mod price;
pub mod product;

pub use id::*;
pub use login_form::{LoginForm, LoginFormErrors};
pub use new_product::{NewProduct, ProductFormErrors};
pub use price::Price;
pub use product::{Product, Rating};
