//! Products

use slotmap::new_key_type;

use crate::plans::PlanPrices;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Catalog product.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Display title.
    pub title: String,

    /// Offered cadences and their prices.
    pub plans: PlanPrices<'a>,
}
