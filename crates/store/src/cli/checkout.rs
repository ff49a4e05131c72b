use std::io;

use clap::{Args, Subcommand};

use tuckshop::summary::OrderSummary;
use tuckshop_store::{
    checkout::{self, CardDetails, PaymentMethod},
    context::StoreContext,
};

use super::load_reconciled;

#[derive(Debug, Args)]
pub(crate) struct CheckoutCommand {
    #[command(subcommand)]
    command: CheckoutSubcommand,
}

#[derive(Debug, Subcommand)]
enum CheckoutSubcommand {
    /// Price the cart, optionally with a promotion code
    Quote(QuoteArgs),
    /// Validate payment and place the order
    Pay(PayArgs),
}

#[derive(Debug, Args)]
struct QuoteArgs {
    /// Promotion code to apply
    #[arg(long)]
    code: Option<String>,
}

#[derive(Debug, Args)]
struct PayArgs {
    /// Promotion code to apply
    #[arg(long)]
    code: Option<String>,

    /// Payment method: card or bank-transfer
    #[arg(long, default_value = "card")]
    method: String,

    /// Card number, for card payments
    #[arg(long)]
    card_number: Option<String>,

    /// Card expiration as YYYY-MM, for card payments
    #[arg(long)]
    card_expiry: Option<String>,

    /// Card security code, for card payments
    #[arg(long)]
    card_cvv: Option<String>,
}

pub(crate) async fn run(command: CheckoutCommand, context: &StoreContext) -> Result<(), String> {
    match command.command {
        CheckoutSubcommand::Quote(args) => quote(args, context).await,
        CheckoutSubcommand::Pay(args) => pay(args, context).await,
    }
}

async fn quote(args: QuoteArgs, context: &StoreContext) -> Result<(), String> {
    let (catalog, cart) = load_reconciled(context).await?;

    if cart.is_empty() {
        println!("cart is empty");
        return Ok(());
    }

    let quote = context
        .checkout()
        .quote(&cart, args.code.as_deref())
        .await
        .map_err(|error| format!("failed to price cart: {error}"))?;

    OrderSummary::new(quote)
        .write_to(io::stdout().lock(), &cart, catalog.products())
        .map_err(|error| format!("failed to render summary: {error}"))?;

    let status = checkout::status_line(&quote);
    if !status.is_empty() {
        println!("{status}");
    }

    Ok(())
}

async fn pay(args: PayArgs, context: &StoreContext) -> Result<(), String> {
    let (catalog, cart) = load_reconciled(context).await?;

    if cart.is_empty() {
        return Err("cart is empty; nothing to order".to_string());
    }

    let payment = payment_from(&args)?;
    let code = args.code.as_deref();

    let checkout_flow = context.checkout();
    let quote = checkout_flow
        .quote(&cart, code)
        .await
        .map_err(|error| format!("failed to price cart: {error}"))?;

    let status = checkout::status_line(&quote);
    if !status.is_empty() {
        println!("{status}");
    }

    let confirmation = checkout_flow
        .place_order(&cart, &catalog, &quote, code, &payment)
        .await
        .map_err(|error| format!("failed to place order: {error}"))?;

    println!("order placed: {}", confirmation.id);
    println!("total charged: {}", quote.total());

    Ok(())
}

fn payment_from(args: &PayArgs) -> Result<PaymentMethod, String> {
    match args.method.as_str() {
        "card" => {
            let number = args
                .card_number
                .as_deref()
                .ok_or("card payments need --card-number")?;
            let expiry = args
                .card_expiry
                .as_deref()
                .ok_or("card payments need --card-expiry")?;
            let cvv = args
                .card_cvv
                .as_deref()
                .ok_or("card payments need --card-cvv")?;

            Ok(PaymentMethod::Card(CardDetails::new(number, expiry, cvv)))
        }
        "bank-transfer" | "bankTransfer" => Ok(PaymentMethod::BankTransfer),
        other => Err(format!("unknown payment method: {other}")),
    }
}
