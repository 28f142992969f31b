//! Catalog commands: product listing, details, categories and creation.

use rust_decimal::Decimal;
use shopfront_core::{NewProduct, Price, Product, ProductId};
use shopfront_storefront::AppError;
use shopfront_storefront::AppState;
use shopfront_storefront::listing::{CategoryFilter, ListingQuery, SortKey, derive_listing};
use shopfront_storefront::pages::{self, CreateOutcome};

use super::{CliError, fetch_product, loaded};

/// Show one page of the product listing.
#[allow(clippy::print_stdout)]
pub async fn products(
    state: &AppState,
    category: Option<&str>,
    sort: SortKey,
    page: usize,
) -> Result<(), CliError> {
    let catalog = loaded(pages::load_catalog(state.catalog()).await, "catalog")?;

    let query = ListingQuery::new(state.config().page_size)
        .with_category(CategoryFilter::from_option(category))
        .with_sort(sort)
        .with_page(page);
    let listing = derive_listing(&catalog.products, &query);

    for product in &listing.items {
        println!("{}", summary_line(state, product));
    }

    if listing.items.is_empty() {
        println!("No products on this page.");
    }
    println!(
        "Page {} of {} ({} matching)",
        listing.page, listing.total_pages, listing.total_matching
    );
    Ok(())
}

/// Show a product's details.
#[allow(clippy::print_stdout)]
pub async fn product(state: &AppState, id: ProductId) -> Result<(), CliError> {
    let product = fetch_product(state, id).await?;

    println!("{}", product.title);
    println!("  id:       {}", product.id);
    println!("  price:    {}", product.price.display());
    println!("  category: {}", product.category);
    if let Some(rating) = product.rating {
        println!("  rating:   {:.1} ({} reviews)", rating.rate, rating.count);
    }
    println!("  image:    {}", product.image);
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
    if let Some(line) = state.cart().line(id) {
        println!();
        println!("In cart: {}", line.quantity);
    }
    Ok(())
}

/// List category names.
#[allow(clippy::print_stdout)]
pub async fn categories(state: &AppState) -> Result<(), CliError> {
    let catalog = loaded(pages::load_catalog(state.catalog()).await, "categories")?;
    for category in catalog.categories {
        println!("{category}");
    }
    Ok(())
}

/// Submit the create-product form.
#[allow(clippy::print_stdout)]
pub async fn create(
    state: &AppState,
    title: String,
    description: String,
    price: Decimal,
    category: String,
    image: String,
) -> Result<(), CliError> {
    let form = NewProduct {
        title,
        description,
        price: Price::new(price),
        category,
        image,
    };

    match pages::create_product(state, form).await {
        CreateOutcome::Created(product) => {
            println!("Created product {}: {}", product.id, product.title);
            Ok(())
        }
        CreateOutcome::Unauthorized => Err(AppError::Unauthorized(
            "sign in to create products".to_string(),
        )
        .into()),
        CreateOutcome::Invalid(errors) => {
            for (field, message) in errors.fields() {
                println!("{field}: {message}");
            }
            Err(AppError::Validation(errors).into())
        }
        CreateOutcome::Failed(message) => Err(CliError::Failed(message)),
    }
}

/// One listing row: ID, price, title, plus cart and wishlist markers.
fn summary_line(state: &AppState, product: &Product) -> String {
    let wished = if state.wishlist().is_in_wishlist(product.id) {
        "*"
    } else {
        " "
    };
    let in_cart = state
        .cart()
        .line(product.id)
        .map(|line| format!(" [x{} in cart]", line.quantity))
        .unwrap_or_default();

    format!(
        "{wished} {:>4}  {:>9}  {} ({}){in_cart}",
        product.id.as_i32(),
        product.price.display(),
        product.title,
        product.category
    )
}
