//! Catalog product types.
//!
//! Products are owned by the remote catalog. Everything downstream (cart
//! lines, wishlist entries, listing pages) holds a by-value snapshot and never
//! mutates one in place.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// Aggregate customer rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average score, 0 to 5.
    pub rate: f64,
    /// Number of ratings.
    pub count: u32,
}

/// A product as returned by the catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog-assigned identifier, unique and stable.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Category name, compared verbatim when filtering.
    pub category: String,
    /// Image URL.
    pub image: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Rating, absent for freshly created products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}
