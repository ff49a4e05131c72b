use clap::{Args, Subcommand};

use tuckshop_store::context::StoreContext;

use super::load_catalog;

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List every product with its offered plans
    List,
}

pub(crate) async fn run(command: ProductsCommand, context: &StoreContext) -> Result<(), String> {
    match command.command {
        ProductsSubcommand::List => list(context).await,
    }
}

async fn list(context: &StoreContext) -> Result<(), String> {
    let catalog = load_catalog(context).await?;

    if catalog.is_empty() {
        println!("no products available");
        return Ok(());
    }

    for (key, product) in catalog.products() {
        let Some(id) = catalog.id_for(key) else {
            continue;
        };

        let plans = product
            .plans
            .kinds()
            .iter()
            .filter_map(|kind| product.plans.plan_for(*kind))
            .map(|plan| format!("{} {}", plan.kind(), plan.price()))
            .collect::<Vec<_>>()
            .join(", ");

        println!("{id}  {title}  [{plans}]", title = product.title);
    }

    Ok(())
}
