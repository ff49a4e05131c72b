//! Storefront Checkout Example
//!
//! This example builds a small catalog, fills a cart with each product's
//! default plan, and prices it with an optional promotion code.
//!
//! Use `-n` to limit the number of products added to the cart
//! Use `-c` to apply a promotion code (try `SAVE10` or `BAHT150`)

use std::io;

use anyhow::Result;
use clap::Parser;
use rusty_money::{Money, iso::THB};
use slotmap::SlotMap;

use tuckshop::{
    cart::{Cart, CartLine},
    discounts::DiscountTerms,
    plans::{PlanKind, PlanPrices},
    pricing::{PricingStatus, Quote, apply_discount},
    products::{Product, ProductKey},
    summary::OrderSummary,
    utils::ExampleCheckoutArgs,
};

/// Storefront Checkout Example
#[expect(clippy::print_stdout, reason = "Example program output to user")]
pub fn main() -> Result<()> {
    let args = ExampleCheckoutArgs::parse();

    let mut products: SlotMap<ProductKey, Product<'static>> = SlotMap::with_key();
    let mut lines = Vec::new();

    let fixtures = [
        (
            "Phonics Adventure",
            PlanPrices::new().with(PlanKind::OneTime, Money::from_minor(35_000, THB)),
        ),
        (
            "Math Safari",
            PlanPrices::new()
                .with(PlanKind::Monthly, Money::from_minor(15_000, THB))
                .with(PlanKind::Yearly, Money::from_minor(120_000, THB)),
        ),
        (
            "Story Time Library",
            PlanPrices::new()
                .with(PlanKind::OneTime, Money::from_minor(50_000, THB))
                .with(PlanKind::Monthly, Money::from_minor(20_000, THB)),
        ),
    ];

    for (title, plans) in fixtures {
        let key = products.insert(Product {
            title: title.to_string(),
            plans,
        });

        if let Some(plan) = plans.default_plan() {
            lines.push(CartLine::new(key, plan));
        }
    }

    if let Some(n) = args.n {
        lines.truncate(n);
    }

    let cart = Cart::with_lines(lines, THB)?;
    let subtotal = cart.subtotal()?;

    let quote = match args.code.as_deref() {
        None => Quote::without_code(subtotal),
        Some(code) => apply_discount(resolve_code(code).as_ref(), subtotal)?,
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    OrderSummary::new(quote).write_to(&mut handle, &cart, &products)?;

    match quote.status() {
        PricingStatus::NoCodeEntered => {}
        PricingStatus::CodeInvalidOrExpired => {
            println!(" This promotion code is invalid or has expired.");
        }
        PricingStatus::BelowMinimumPurchase => {
            println!(" Your order does not reach the minimum for this promotion code.");
        }
        PricingStatus::Applied => println!(" Promotion code applied."),
    }

    Ok(())
}

/// Built-in promotion table standing in for the storefront's code lookup.
fn resolve_code(code: &str) -> Option<DiscountTerms<'static>> {
    match code {
        "SAVE10" => DiscountTerms::percent(10.0, Money::from_minor(0, THB)).ok(),
        "BAHT150" => Some(DiscountTerms::flat(
            Money::from_minor(15_000, THB),
            Money::from_minor(50_000, THB),
        )),
        _ => None,
    }
}
