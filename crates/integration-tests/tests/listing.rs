//! Integration tests for the product listing view-model.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use shopfront_core::Product;
use shopfront_integration_tests::product;
use shopfront_storefront::listing::{CategoryFilter, ListingQuery, SortKey, derive_listing};

fn ids(items: &[Product]) -> Vec<i32> {
    items.iter().map(|p| p.id.as_i32()).collect()
}

fn catalog() -> Vec<Product> {
    vec![
        product(1, "men's clothing", 10995),
        product(2, "men's clothing", 2230),
        product(3, "jewelery", 69500),
        product(4, "electronics", 6400),
        product(5, "jewelery", 1099),
        product(6, "electronics", 10900),
        product(7, "women's clothing", 5699),
        product(8, "jewelery", 999),
    ]
}

#[test]
fn test_filter_sort_paginate_in_order() {
    let query = ListingQuery::new(2)
        .with_category(CategoryFilter::Category("jewelery".to_string()))
        .with_sort(SortKey::PriceAscending);

    let first = derive_listing(&catalog(), &query);
    assert_eq!(ids(&first.items), [8, 5]);
    assert_eq!(first.total_matching, 3);
    assert_eq!(first.total_pages, 2);
    assert!(first.has_next());

    let second = derive_listing(&catalog(), &query.with_page(2));
    assert_eq!(ids(&second.items), [3]);
    assert!(!second.has_next());
}

#[test]
fn test_descending_then_category_sort() {
    let all = ListingQuery::new(10);

    let by_price = derive_listing(&catalog(), &all.clone().with_sort(SortKey::PriceDescending));
    assert_eq!(ids(&by_price.items), [3, 1, 6, 4, 7, 2, 5, 8]);

    let by_category =
        derive_listing(&catalog(), &all.with_sort(SortKey::CategoryAlphabetical));
    assert_eq!(ids(&by_category.items), [4, 6, 3, 5, 8, 1, 2, 7]);
}

#[test]
fn test_twenty_three_items_paginate_to_three_pages() {
    let products: Vec<_> = (1..=23).map(|i| product(i, "a", 100)).collect();
    let query = ListingQuery::new(10);

    let pages: Vec<_> = (1..=4)
        .map(|page| derive_listing(&products, &query.clone().with_page(page)))
        .collect();

    assert!(pages.iter().all(|p| p.total_pages == 3));
    assert_eq!(pages[0].items.len(), 10);
    assert_eq!(pages[1].items.len(), 10);
    assert_eq!(pages[2].items.len(), 3);
    assert!(pages[3].items.is_empty());
}

#[test]
fn test_listing_leaves_input_untouched() {
    let products = catalog();
    let before = products.clone();
    let _ = derive_listing(&products, &ListingQuery::new(3).with_sort(SortKey::PriceAscending));
    assert_eq!(products, before);
}

#[test]
fn test_sort_key_parses_cli_values() {
    for (raw, key) in [
        ("none", SortKey::None),
        ("price-asc", SortKey::PriceAscending),
        ("price-desc", SortKey::PriceDescending),
        ("category", SortKey::CategoryAlphabetical),
    ] {
        let parsed: SortKey = raw.parse().unwrap();
        assert_eq!(parsed, key);
        assert_eq!(parsed.to_string(), raw);
    }
}
