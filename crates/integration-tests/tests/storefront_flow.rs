//! Integration tests for cross-store interactions through `AppState`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use shopfront_core::{LoginForm, NewProduct, Price, ProductId};
use shopfront_integration_tests::{TestContext, product};
use shopfront_storefront::notifications::NotificationKind;
use shopfront_storefront::LoginOutcome;
use shopfront_storefront::pages::{self, CreateOutcome, LoadState};

// =============================================================================
// Cart Flow Tests
// =============================================================================

#[test]
fn test_cart_totals_for_mixed_adds() {
    let ctx = TestContext::new();
    let state = ctx.start();
    let a = product(1, "electronics", 1000);
    let b = product(2, "jewelery", 550);

    state.add_to_cart(&a);
    state.add_to_cart(&a);
    state.add_to_cart(&b);

    assert_eq!(state.cart().total_items(), 3);
    assert_eq!(state.cart().total_price(), Price::from_cents(2550));
    assert_eq!(state.cart().total_price().display(), "$25.50");
    assert_eq!(state.cart().pulse().sequence, 3);

    let kinds: Vec<_> = state.notifications().active().iter().map(|n| n.kind).collect();
    assert_eq!(kinds, [NotificationKind::Cart; 3]);
}

#[test]
fn test_quantity_removal_matches_remove_item() {
    let ctx = TestContext::new();
    let state = ctx.start();
    for id in 1..=3 {
        state.add_to_cart(&product(id, "electronics", 100));
    }

    state.cart().update_quantity(ProductId::new(1), 0);
    state.cart().update_quantity(ProductId::new(2), -5);
    state.cart().remove_item(ProductId::new(3));

    assert!(state.cart().is_empty());
    assert_eq!(state.cart().total_price(), Price::zero());
}

#[test]
fn test_checkout_keeps_cart() {
    let ctx = TestContext::new();
    let state = ctx.start();
    state.add_to_cart(&product(1, "electronics", 1250));
    state.add_to_cart(&product(1, "electronics", 1250));

    assert_eq!(state.cart().checkout(), Price::from_cents(2500));
    assert_eq!(state.cart().total_items(), 2);
}

// =============================================================================
// Wishlist Flow Tests
// =============================================================================

#[test]
fn test_toggle_roundtrip_and_notifications() {
    let ctx = TestContext::new();
    let state = ctx.start();
    let p = product(5, "jewelery", 6950);

    assert!(state.toggle_wishlist(&p));
    assert!(state.wishlist().is_in_wishlist(p.id));
    assert!(!state.toggle_wishlist(&p));
    assert!(state.wishlist().is_empty());

    let notes = state.notifications().drain();
    assert_eq!(notes.len(), 2);
    assert!(notes.iter().all(|n| n.kind == NotificationKind::Wishlist));
    assert_ne!(notes[0].id, notes[1].id);
}

#[test]
fn test_notification_dismiss_after_drain_is_noop() {
    let ctx = TestContext::new();
    let state = ctx.start();
    state.add_to_cart(&product(1, "electronics", 100));

    let id = state.notifications().active()[0].id.clone();
    state.notifications().drain();
    state.notifications().dismiss(&id);
    assert!(state.notifications().is_empty());
}

// =============================================================================
// Auth / Network Failure Tests
// =============================================================================

#[tokio::test]
async fn test_blank_login_is_rejected_locally() {
    let ctx = TestContext::new();
    let state = ctx.start();

    let outcome = state.login(&LoginForm::new("  ", "secret")).await;
    let LoginOutcome::Invalid(errors) = outcome else {
        panic!("expected validation errors");
    };
    assert_eq!(errors.username.as_deref(), Some("Username is required"));
    assert!(errors.password.is_none());
    assert!(state.auth().error().is_none());
    assert!(state.notifications().is_empty());
}

#[tokio::test]
async fn test_unreachable_catalog_fails_login_with_message() {
    let ctx = TestContext::new();
    let state = ctx.start();

    let outcome = state.login(&LoginForm::new("mor_2314", "83r5^_")).await;
    assert_eq!(outcome, LoginOutcome::Rejected);
    assert!(state.notifications().is_empty());

    let session = state.auth().snapshot();
    assert!(!session.is_authenticated);
    assert!(!session.is_loading);
    assert!(session.token.is_none());
    assert!(!session.error.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_unreachable_catalog_fails_page_loads() {
    let ctx = TestContext::new();
    let state = ctx.start();

    let catalog = pages::load_catalog(state.catalog()).await;
    assert!(matches!(
        catalog,
        LoadState::Failed { ref message, retryable: true } if !message.is_empty()
    ));

    state.catalog().invalidate_all();
    let product = pages::load_product(state.catalog(), ProductId::new(1)).await;
    assert!(matches!(product, LoadState::Failed { retryable: true, .. }));
}

#[tokio::test]
async fn test_create_product_flow() {
    let ctx = TestContext::new();
    ctx.seed_session("mor_2314", "eyJhbGciOi");
    let state = ctx.start();

    let blank = pages::create_product(&state, NewProduct::default()).await;
    let CreateOutcome::Invalid(errors) = blank else {
        panic!("expected validation errors");
    };
    assert_eq!(errors.fields().count(), 5);
    assert!(state.notifications().is_empty());

    let form = NewProduct {
        title: "Desk lamp".to_string(),
        description: "Warm light".to_string(),
        price: Price::from_cents(2499),
        category: "electronics".to_string(),
        image: "https://example.com/lamp.jpg".to_string(),
    };
    let outcome = pages::create_product(&state, form).await;
    assert!(matches!(outcome, CreateOutcome::Failed(_)));

    let notes = state.notifications().active();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::Error);
}

#[tokio::test]
async fn test_create_product_requires_session() {
    let ctx = TestContext::new();
    let state = ctx.start();

    let outcome = pages::create_product(&state, NewProduct::default()).await;
    assert_eq!(outcome, CreateOutcome::Unauthorized);
}
