use clap::{Parser, Subcommand};

use tuckshop::cart::Cart;
use tuckshop_store::{
    STORE_CURRENCY,
    catalog::Catalog,
    config::StoreConfig,
    context::StoreContext,
    selections::{self, Reconciled},
};

mod cart;
mod checkout;
mod favorites;
mod library;
mod products;

#[derive(Debug, Parser)]
#[command(name = "tuckshop-store", about = "Tuckshop storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: StoreConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Products(products::ProductsCommand),
    Cart(cart::CartCommand),
    Favorites(favorites::FavoritesCommand),
    Checkout(checkout::CheckoutCommand),
    Library(library::LibraryArgs),
}

impl Cli {
    pub(crate) fn log_level(&self) -> &str {
        &self.config.log_level
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        let context = StoreContext::from_config(&self.config);

        match self.command {
            Commands::Products(command) => products::run(command, &context).await,
            Commands::Cart(command) => cart::run(command, &context).await,
            Commands::Favorites(command) => favorites::run(command, &context).await,
            Commands::Checkout(command) => checkout::run(command, &context).await,
            Commands::Library(args) => library::run(args, &context).await,
        }
    }
}

/// Fetch the live catalog.
pub(crate) async fn load_catalog(context: &StoreContext) -> Result<Catalog, String> {
    let records = context
        .products
        .fetch_products()
        .await
        .map_err(|error| format!("failed to fetch products: {error}"))?;

    Catalog::from_records(records).map_err(|error| format!("failed to build catalog: {error}"))
}

/// Fetch the live catalog and replay the saved cart against it.
///
/// Vanished products are reported on stdout and left out of the cart.
pub(crate) async fn load_reconciled(
    context: &StoreContext,
) -> Result<(Catalog, Cart<'static>), String> {
    let catalog = load_catalog(context).await?;

    let saved = context
        .selections
        .selections()
        .await
        .map_err(|error| format!("failed to load cart: {error}"))?;

    let Reconciled { lines, dropped } = selections::reconcile(&saved, &catalog);

    for product_id in &dropped {
        println!("note: {product_id} is no longer available and was left out of the cart");
    }

    let cart = Cart::with_lines(lines, STORE_CURRENCY)
        .map_err(|error| format!("failed to assemble cart: {error}"))?;

    Ok((catalog, cart))
}
