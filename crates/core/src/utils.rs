//! Utils

use clap::Parser;

/// Arguments for the checkout examples
#[derive(Debug, Parser)]
pub struct ExampleCheckoutArgs {
    /// Number of catalog products to add to the cart
    #[clap(short, long)]
    pub n: Option<usize>,

    /// Promotion code to apply at checkout
    #[clap(short, long)]
    pub code: Option<String>,
}
