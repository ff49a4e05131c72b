use clap::{Args, Subcommand};

use tuckshop_store::{context::StoreContext, selections};

use super::load_catalog;

#[derive(Debug, Args)]
pub(crate) struct FavoritesCommand {
    #[command(subcommand)]
    command: FavoritesSubcommand,
}

#[derive(Debug, Subcommand)]
enum FavoritesSubcommand {
    /// List favorited products still in the catalog
    List,
    /// Favorite a product, or unfavorite one already favorited
    Toggle(ToggleArgs),
}

#[derive(Debug, Args)]
struct ToggleArgs {
    /// Storefront product id
    product_id: String,
}

pub(crate) async fn run(command: FavoritesCommand, context: &StoreContext) -> Result<(), String> {
    match command.command {
        FavoritesSubcommand::List => list(context).await,
        FavoritesSubcommand::Toggle(args) => toggle(args, context).await,
    }
}

async fn list(context: &StoreContext) -> Result<(), String> {
    let catalog = load_catalog(context).await?;

    let ids = context
        .local
        .favorites()
        .map_err(|error| format!("failed to load favorites: {error}"))?;

    let reconciled = selections::reconcile_favorites(&ids, &catalog);

    for product_id in &reconciled.dropped {
        println!("note: {product_id} is no longer available");
    }

    if reconciled.keys.is_empty() {
        println!("no favorites yet");
        return Ok(());
    }

    for key in reconciled.keys {
        let Some(product) = catalog.product(key) else {
            continue;
        };
        let Some(id) = catalog.id_for(key) else {
            continue;
        };

        println!("{id}  {title}", title = product.title);
    }

    Ok(())
}

async fn toggle(args: ToggleArgs, context: &StoreContext) -> Result<(), String> {
    let record = context
        .products
        .fetch_product(&args.product_id)
        .await
        .map_err(|error| format!("failed to fetch product: {error}"))?;

    let favorited = context
        .local
        .toggle_favorite(&record.id)
        .map_err(|error| format!("failed to update favorites: {error}"))?;

    if favorited {
        println!("favorited {}", record.title);
    } else {
        println!("unfavorited {}", record.title);
    }

    Ok(())
}
