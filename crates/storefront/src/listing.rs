//! Product listing derivation: filter, then sort, then paginate.
//!
//! [`derive_listing`] is a pure function of the product list and a
//! [`ListingQuery`]. It is recomputed whenever any input changes; nothing is
//! cached between calls.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use shopfront_core::Product;
use thiserror::Error;

/// Which categories to keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// No filtering.
    #[default]
    All,
    /// Keep products whose category equals this string exactly.
    Category(String),
}

impl CategoryFilter {
    /// Build a filter from an optional category; `None` or blank means all.
    #[must_use]
    pub fn from_option(category: Option<&str>) -> Self {
        match category {
            Some(c) if !c.is_empty() => Self::Category(c.to_string()),
            _ => Self::All,
        }
    }

    fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => product.category == *category,
        }
    }
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Catalog order.
    #[default]
    None,
    PriceAscending,
    PriceDescending,
    CategoryAlphabetical,
}

/// Error parsing a [`SortKey`].
#[derive(Debug, Error)]
#[error("unknown sort key '{0}' (expected none, price-asc, price-desc or category)")]
pub struct ParseSortKeyError(String);

impl SortKey {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::PriceAscending => "price-asc",
            Self::PriceDescending => "price-desc",
            Self::CategoryAlphabetical => "category",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::None => Ordering::Equal,
            Self::PriceAscending => a.price.cmp(&b.price),
            Self::PriceDescending => b.price.cmp(&a.price),
            Self::CategoryAlphabetical => a.category.cmp(&b.category),
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" => Ok(Self::None),
            "price-asc" => Ok(Self::PriceAscending),
            "price-desc" => Ok(Self::PriceDescending),
            "category" => Ok(Self::CategoryAlphabetical),
            other => Err(ParseSortKeyError(other.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-chosen listing parameters.
///
/// Changing the category or sort through [`ListingQuery::with_category`] and
/// [`ListingQuery::with_sort`] resets the page to 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub category: CategoryFilter,
    pub sort: SortKey,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
}

impl ListingQuery {
    /// First page, no filter, catalog order.
    #[must_use]
    pub const fn new(page_size: usize) -> Self {
        Self {
            category: CategoryFilter::All,
            sort: SortKey::None,
            page: 1,
            page_size,
        }
    }

    /// Change the category filter and go back to the first page.
    #[must_use]
    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self.page = 1;
        self
    }

    /// Change the sort order and go back to the first page.
    #[must_use]
    pub const fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self.page = 1;
        self
    }

    /// Jump to a page. Out-of-range pages are allowed and render empty.
    #[must_use]
    pub const fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }
}

/// One derived page of the listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub items: Vec<Product>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matching: usize,
}

impl ListingPage {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Derive the visible page from the full product list.
///
/// - Filtering keeps catalog order.
/// - Sorting is stable: ties keep their filtered order.
/// - A page beyond `total_pages` yields an empty `items` rather than being
///   clamped. Page 0 is read as page 1. A zero `page_size` yields no pages.
#[must_use]
pub fn derive_listing(products: &[Product], query: &ListingQuery) -> ListingPage {
    let mut matching: Vec<&Product> = products
        .iter()
        .filter(|p| query.category.matches(p))
        .collect();

    if query.sort != SortKey::None {
        // `sort_by` is stable
        matching.sort_by(|a, b| query.sort.compare(a, b));
    }

    let total_matching = matching.len();
    let page = query.page.max(1);

    if query.page_size == 0 {
        return ListingPage {
            items: Vec::new(),
            page,
            total_pages: 0,
            total_matching,
        };
    }

    let total_pages = total_matching.div_ceil(query.page_size);
    let start = (page - 1).saturating_mul(query.page_size);

    let items = matching
        .into_iter()
        .skip(start)
        .take(query.page_size)
        .cloned()
        .collect();

    ListingPage {
        items,
        page,
        total_pages,
        total_matching,
    }
}
