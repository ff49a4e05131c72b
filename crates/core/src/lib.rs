//! Tuckshop
//!
//! Tuckshop is the checkout engine for a digital-products storefront: carts
//! of per-plan product selections, promotion-code discounts, payment field
//! validation, and order summaries.

pub mod cart;
pub mod discounts;
pub mod payment;
pub mod plans;
pub mod pricing;
pub mod products;
pub mod summary;
pub mod utils;
