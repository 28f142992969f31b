//! Shopfront CLI - browse the catalog and manage the local cart, wishlist and
//! session from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List jewelery, cheapest first
//! shopfront products --category jewelery --sort price-asc
//!
//! # Add product 3 to the cart and show it
//! shopfront cart add 3
//! shopfront cart show
//!
//! # Sign in, then create a product
//! shopfront login -u mor_2314 -p 83r5^_
//! shopfront create --title Lamp --description "Warm light" --price 24.99 \
//!     --category electronics --image https://example.com/lamp.jpg
//! ```
//!
//! State is kept in `SHOPFRONT_STORAGE_DIR` between runs unless `--ephemeral`
//! is passed. Logs go to stderr; set `RUST_LOG` to change the level.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use shopfront_core::ProductId;
use shopfront_storefront::AppState;
use shopfront_storefront::config::StorefrontConfig;
use shopfront_storefront::listing::SortKey;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront storefront CLI")]
struct Cli {
    /// Keep state in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,

        /// Sort order (`none`, `price-asc`, `price-desc`, `category`)
        #[arg(short, long, default_value = "none")]
        sort: SortKey,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Show one product
    Product {
        /// Product ID
        id: ProductId,
    },
    /// List categories
    Categories,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Sign in
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Create a product (requires a session)
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        /// Price in dollars, e.g. `24.99`
        #[arg(long)]
        price: Decimal,

        #[arg(long)]
        category: String,

        /// Absolute image URL
        #[arg(long)]
        image: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show lines and totals
    Show,
    /// Add one unit of a product
    Add { id: ProductId },
    /// Remove a product's line
    Remove { id: ProductId },
    /// Set a line's quantity; zero or less removes it
    Set {
        id: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Check out (prints the total, leaves the cart as is)
    Checkout,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show wishlist entries
    Show,
    /// Add the product if absent, remove it otherwise
    Toggle { id: ProductId },
    /// Add a product
    Add { id: ProductId },
    /// Remove a product
    Remove { id: ProductId },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let result = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_cli=info,shopfront_storefront=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = StorefrontConfig::from_env().map_err(shopfront_storefront::AppError::from)?;
    let state = if cli.ephemeral {
        AppState::ephemeral(config)
    } else {
        AppState::open(config)?
    };

    let result = dispatch(&state, cli.command).await;

    // Notifications are shown whether or not the command succeeded
    commands::print_notifications(&state);
    result
}

async fn dispatch(state: &AppState, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Products {
            category,
            sort,
            page,
        } => commands::catalog::products(state, category.as_deref(), sort, page).await,
        Commands::Product { id } => commands::catalog::product(state, id).await,
        Commands::Categories => commands::catalog::categories(state).await,
        Commands::Create {
            title,
            description,
            price,
            category,
            image,
        } => {
            commands::catalog::create(state, title, description, price, category, image).await
        }
        Commands::Cart { action } => match action {
            CartAction::Show => {
                commands::cart::show(state);
                Ok(())
            }
            CartAction::Add { id } => commands::cart::add(state, id).await,
            CartAction::Remove { id } => {
                commands::cart::remove(state, id);
                Ok(())
            }
            CartAction::Set { id, quantity } => {
                commands::cart::set(state, id, quantity);
                Ok(())
            }
            CartAction::Clear => {
                state.cart().clear_cart();
                Ok(())
            }
            CartAction::Checkout => {
                commands::cart::checkout(state);
                Ok(())
            }
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => {
                commands::wishlist::show(state);
                Ok(())
            }
            WishlistAction::Toggle { id } => commands::wishlist::toggle(state, id).await,
            WishlistAction::Add { id } => commands::wishlist::add(state, id).await,
            WishlistAction::Remove { id } => {
                state.wishlist().remove_item(id);
                Ok(())
            }
        },
        Commands::Login { username, password } => {
            commands::account::login(state, username, password).await
        }
        Commands::Logout => {
            state.logout();
            Ok(())
        }
        Commands::Whoami => {
            commands::account::whoami(state);
            Ok(())
        }
    }
}
