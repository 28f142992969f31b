//! Create-product form and its client-side validation.

use core::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::Price;

/// Input for creating a product in the catalog.
///
/// ## Constraints
///
/// - `title`, `description` and `image` must not be blank
/// - `price` must be strictly positive
/// - `category` must be selected
/// - `image` must be an absolute URL
///
/// ## Examples
///
/// ```
/// use shopfront_core::{NewProduct, Price};
///
/// let form = NewProduct {
///     title: "Mechanical keyboard".to_string(),
///     description: "Hot-swappable switches".to_string(),
///     price: Price::from_cents(8900),
///     category: "electronics".to_string(),
///     image: "https://example.com/keyboard.png".to_string(),
/// };
/// assert!(form.validate().is_ok());
///
/// let blank = NewProduct::default();
/// let errors = blank.validate().unwrap_err();
/// assert_eq!(errors.title.as_deref(), Some("Title is required"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub image: String,
}

/// Per-field validation messages for [`NewProduct`].
///
/// A `None` field passed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFormErrors {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

impl NewProduct {
    /// Validate the form before any network call is made.
    ///
    /// # Errors
    ///
    /// Returns [`ProductFormErrors`] with a message for every invalid field.
    pub fn validate(&self) -> Result<(), ProductFormErrors> {
        let mut errors = ProductFormErrors::default();

        if self.title.trim().is_empty() {
            errors.title = Some("Title is required".to_string());
        }

        if self.description.trim().is_empty() {
            errors.description = Some("Description is required".to_string());
        }

        if !self.price.is_positive() {
            errors.price = Some("Price must be a positive number".to_string());
        }

        if self.category.is_empty() {
            errors.category = Some("Category is required".to_string());
        }

        if self.image.trim().is_empty() {
            errors.image = Some("Image URL is required".to_string());
        } else if Url::parse(self.image.trim()).is_err() {
            errors.image = Some("Please enter a valid URL".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl ProductFormErrors {
    /// True when no field has an error.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.image.is_none()
    }

    /// `(field, message)` pairs in form order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("title", self.title.as_deref()),
            ("description", self.description.as_deref()),
            ("price", self.price.as_deref()),
            ("category", self.category.as_deref()),
            ("image", self.image.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, message)| message.map(|m| (field, m)))
    }
}

impl fmt::Display for ProductFormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self
            .fields()
            .map(|(_, message)| message)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&summary)
    }
}

impl std::error::Error for ProductFormErrors {}

impl fmt::Display for NewProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.title, self.category, self.price)
    }
}
