//! Storefront CLI
//!
//! Inspect and edit the persisted cart and wishlist against a fixture catalog.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use tabled::{builder::Builder, settings::Style};
use tracing::info;

use storefront::{
    cart::{AddToCart, CartStore, Outcome},
    config::StorefrontConfig,
    fixtures::Fixture,
    observability::init_subscriber,
    products::Product,
    receipt::write_cart,
    storage::FileStore,
    wishlist::Wishlist,
};

/// Storefront cart, wishlist and drop tools
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront cart, wishlist and drop tools", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: StorefrontConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage the cart
    #[command(subcommand)]
    Cart(CartCommand),

    /// Manage the wishlist
    #[command(subcommand)]
    Wishlist(WishlistCommand),

    /// List catalog products, newest first
    Products {
        /// Only products whose collection matches this slug
        #[arg(long)]
        collection: Option<String>,
    },

    /// Show the drop countdown
    Countdown,
}

#[derive(Debug, Subcommand)]
enum CartCommand {
    /// Print the cart
    Show,

    /// Add one unit of a product
    Add {
        /// Product id
        product_id: String,

        /// Size, defaults to the product's first size
        #[arg(long)]
        size: Option<String>,

        /// Color, defaults to the product's first variant
        #[arg(long)]
        color: Option<String>,

        /// Image to store instead of the variant thumbnail
        #[arg(long)]
        image: Option<String>,
    },

    /// Remove a line
    Remove {
        /// Product id
        product_id: String,

        /// Size of the line
        #[arg(long)]
        size: String,

        /// Color of the line
        #[arg(long)]
        color: String,
    },

    /// Set the quantity of a line
    Qty {
        /// Product id
        product_id: String,

        /// New quantity, clamped to at least 1
        qty: f64,

        /// Size of the line
        #[arg(long)]
        size: String,

        /// Color of the line
        #[arg(long)]
        color: String,
    },

    /// Empty the cart
    Clear,
}

#[derive(Debug, Subcommand)]
enum WishlistCommand {
    /// Print saved products
    Show,

    /// Save or unsave a product
    Toggle {
        /// Product id
        product_id: String,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (ignore if missing)
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_subscriber(&cli.config)?;

    let currency = cli.config.currency()?;
    let fixture = Fixture::from_set_in(&cli.config.fixtures, &cli.config.fixture_set)
        .with_context(|| format!("loading fixture set {:?}", cli.config.fixture_set))?;
    let storage = FileStore::open(&cli.config.data_dir)?;

    info!(
        data_dir = %cli.config.data_dir.display(),
        products = fixture.catalog().len(),
        "storefront ready"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Cart(command) => run_cart(&mut out, command, &fixture, storage, currency),
        Command::Wishlist(command) => run_wishlist(&mut out, command, &fixture, storage, currency),
        Command::Products { collection } => {
            let catalog = fixture.catalog();
            let products = match collection.as_deref() {
                Some(slug) => catalog.in_collection(slug),
                None => catalog.newest_first(),
            };

            write_products(&mut out, &products, currency)
        }
        Command::Countdown => {
            let settings = fixture.settings();
            let now = Timestamp::now();

            writeln!(out, "{}", settings.headline(now))?;
            writeln!(out, "{}", settings.time_left(now))?;

            Ok(())
        }
    }
}

fn run_cart(
    out: &mut impl Write,
    command: CartCommand,
    fixture: &Fixture,
    storage: FileStore,
    currency: &'static Currency,
) -> Result<()> {
    let mut cart = CartStore::init(storage)?;

    let outcome = match command {
        CartCommand::Show => None,
        CartCommand::Add {
            product_id,
            size,
            color,
            image,
        } => {
            let product = fixture.product(&product_id)?;

            if !product.can_buy() {
                writeln!(out, "{} is sold out.", product.name)?;
                return Ok(());
            }

            let (default_color, default_size) = product.default_selection();

            let mut opts = AddToCart::new(
                size.unwrap_or(default_size),
                color.unwrap_or(default_color),
            );
            opts.image = image;

            Some(cart.add_to_cart(product, &opts))
        }
        CartCommand::Remove {
            product_id,
            size,
            color,
        } => Some(cart.remove_from_cart(&product_id, &size, &color)),
        CartCommand::Qty {
            product_id,
            qty,
            size,
            color,
        } => Some(cart.update_qty(&product_id, &size, &color, Some(qty))),
        CartCommand::Clear => Some(cart.clear_cart()),
    };

    if let Some(Outcome::Rejected(reason)) = outcome {
        writeln!(out, "Nothing changed: {reason}")?;
    }

    write_cart(&mut *out, cart.items(), currency)?;
    cart.close()?;

    Ok(())
}

fn run_wishlist(
    out: &mut impl Write,
    command: WishlistCommand,
    fixture: &Fixture,
    storage: FileStore,
    currency: &'static Currency,
) -> Result<()> {
    let mut wishlist = Wishlist::init(storage)?;

    if let WishlistCommand::Toggle { product_id } = command
        && let Outcome::Rejected(reason) = wishlist.toggle(&product_id)
    {
        writeln!(out, "Nothing changed: {reason}")?;
    }

    let saved = wishlist.saved_items(fixture.catalog());

    if saved.is_empty() {
        writeln!(out, "Your wishlist is empty.")?;
    } else {
        write_products(&mut *out, &saved, currency)?;
    }

    wishlist.close()?;

    Ok(())
}

fn write_products(
    out: &mut impl Write,
    products: &[&Product],
    currency: &'static Currency,
) -> Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Name", "Price", "Colors", "Sizes", "Status"]);

    for product in products {
        let status = if product.locked {
            "locked"
        } else {
            product.status.as_str()
        };

        let colors: Vec<String> = product
            .display_variants()
            .into_iter()
            .map(|variant| variant.color_name)
            .collect();

        builder.push_record([
            product.id.clone(),
            product.name.clone(),
            Money::from_major(product.price, currency).to_string(),
            colors.join(", "),
            product.sizes.join(", "),
            status.to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    writeln!(out, "{table}")?;

    Ok(())
}
