//! Storecart CLI - a shopping cart persisted to a local file.
//!
//! # Usage
//!
//! ```bash
//! # Add two of an item
//! storecart add --id A --title "Linen Shirt" --price 10.00 --quantity 2 \
//!     --variant-id gid://shopify/ProductVariant/123
//!
//! # Change quantity, remove, clear
//! storecart update A 5
//! storecart remove A
//! storecart clear
//!
//! # Show contents and totals
//! storecart show
//!
//! # Print the checkout permalink, or create a checkout via the API
//! storecart checkout-url --store shop.example.com
//! storecart checkout
//! ```
//!
//! The cart file defaults to `.storecart/storage.json`; override with
//! `--cart-file` or `STORECART_CART_FILE`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use storecart_core::{CART_STORAGE_KEY, LineItemInput};

mod commands;
mod storage;

use storage::FileSlot;

#[derive(Parser)]
#[command(name = "storecart")]
#[command(author, version, about = "Storecart command-line cart")]
struct Cli {
    /// Storage file holding the cart
    #[arg(long, global = true)]
    cart_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an item (merges with an existing line of the same id)
    Add {
        /// Line item id
        #[arg(long)]
        id: String,

        /// Unit price, e.g. 19.99
        #[arg(long)]
        price: String,

        /// Quantity (defaults to 1)
        #[arg(short, long)]
        quantity: Option<String>,

        /// Display title
        #[arg(short, long, default_value = "")]
        title: String,

        /// Product handle
        #[arg(long, default_value = "")]
        handle: String,

        /// Shopify product variant GID
        #[arg(long)]
        variant_id: Option<String>,

        /// ISO 4217 currency code (defaults to USD)
        #[arg(long)]
        currency: Option<String>,

        /// Image URL
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Set the quantity of an item
    Update {
        /// Line item id
        id: String,
        /// New quantity (values below 1 become 1)
        quantity: String,
    },
    /// Remove an item
    Remove {
        /// Line item id
        id: String,
    },
    /// Remove all items
    Clear,
    /// Show cart contents and totals
    Show {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the checkout permalink for the cart
    CheckoutUrl {
        /// Store domain (defaults to `SHOPIFY_STORE`)
        #[arg(long)]
        store: Option<String>,
    },
    /// Create a hosted checkout via the Storefront API and print its URL
    Checkout,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storecart_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

#[allow(clippy::print_stdout)]
async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let path = storage::resolve_cart_file(cli.cart_file);
    tracing::debug!(path = %path.display(), "Using cart file");
    let mut cart = commands::cart::open(FileSlot::new(path, CART_STORAGE_KEY));

    match cli.command {
        Commands::Add {
            id,
            price,
            quantity,
            title,
            handle,
            variant_id,
            currency,
            image_url,
        } => {
            let input = LineItemInput {
                id,
                variant_id,
                title,
                handle,
                quantity,
                price,
                currency,
                image_url,
                image_alt: None,
            };
            commands::cart::add(&mut cart, input)?;
        }
        Commands::Update { id, quantity } => commands::cart::update(&mut cart, &id, &quantity),
        Commands::Remove { id } => commands::cart::remove(&mut cart, &id),
        Commands::Clear => commands::cart::clear(&mut cart),
        Commands::Show { json } => {
            if json {
                println!("{}", commands::cart::render_json(&cart)?);
            } else {
                print!("{}", commands::cart::render(&cart));
            }
        }
        Commands::CheckoutUrl { store } => {
            println!("{}", commands::checkout::permalink(&cart, store)?);
        }
        Commands::Checkout => {
            println!("{}", commands::checkout::create(&cart).await?);
        }
    }
    Ok(())
}
