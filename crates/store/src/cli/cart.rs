use std::io;

use clap::{Args, Subcommand};

use tuckshop::{plans::PlanKind, pricing::Quote, summary::OrderSummary};
use tuckshop_store::{context::StoreContext, selections::SavedSelection};

use super::load_reconciled;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart priced from the live catalog
    Show,
    /// Add a product to the cart
    Add(AddArgs),
    /// Change the plan of a carted product
    Plan(PlanArgs),
    /// Remove a product from the cart
    Remove(RemoveArgs),
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Storefront product id
    product_id: String,

    /// Plan cadence; the product's default plan when omitted
    #[arg(long)]
    plan: Option<PlanKind>,
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// Storefront product id
    product_id: String,

    /// Plan cadence to switch to
    plan: PlanKind,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Storefront product id
    product_id: String,
}

pub(crate) async fn run(command: CartCommand, context: &StoreContext) -> Result<(), String> {
    match command.command {
        CartSubcommand::Show => show(context).await,
        CartSubcommand::Add(args) => add(args, context).await,
        CartSubcommand::Plan(args) => plan(args, context).await,
        CartSubcommand::Remove(args) => remove(args, context).await,
    }
}

async fn show(context: &StoreContext) -> Result<(), String> {
    let (catalog, cart) = load_reconciled(context).await?;

    if cart.is_empty() {
        println!("cart is empty");
        return Ok(());
    }

    let subtotal = cart
        .subtotal()
        .map_err(|error| format!("failed to price cart: {error}"))?;

    OrderSummary::new(Quote::without_code(subtotal))
        .write_to(io::stdout().lock(), &cart, catalog.products())
        .map_err(|error| format!("failed to render cart: {error}"))?;

    Ok(())
}

async fn add(args: AddArgs, context: &StoreContext) -> Result<(), String> {
    let record = context
        .products
        .fetch_product(&args.product_id)
        .await
        .map_err(|error| format!("failed to fetch product: {error}"))?;

    let plan = match args.plan {
        Some(plan) if record.offers(plan) => plan,
        Some(plan) => {
            return Err(format!("{} is not offered {plan}", record.title));
        }
        None => record
            .default_plan_kind()
            .ok_or_else(|| format!("{} is not offered on any plan", record.title))?,
    };

    context
        .selections
        .add(SavedSelection::new(record.id, plan))
        .await
        .map_err(|error| format!("failed to add to cart: {error}"))?;

    println!("added {title} ({plan})", title = record.title);

    Ok(())
}

async fn plan(args: PlanArgs, context: &StoreContext) -> Result<(), String> {
    context
        .selections
        .set_plan(&args.product_id, args.plan)
        .await
        .map_err(|error| format!("failed to change plan: {error}"))?;

    println!("{} is now {}", args.product_id, args.plan);

    Ok(())
}

async fn remove(args: RemoveArgs, context: &StoreContext) -> Result<(), String> {
    context
        .selections
        .remove(&args.product_id)
        .await
        .map_err(|error| format!("failed to remove from cart: {error}"))?;

    println!("removed {}", args.product_id);

    Ok(())
}
