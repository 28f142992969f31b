//! Unified error handling.
//!
//! Store operations never fail outward; they record errors as state. `AppError`
//! covers the remaining fallible surface: startup, page loaders and the CLI.

use shopfront_core::{LoginFormErrors, ProductFormErrors};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog service operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Durable storage could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Create-product form failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ProductFormErrors),

    /// Sign-in form had a blank field.
    #[error("Validation error: {0}")]
    InvalidLogin(#[from] LoginFormErrors),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
