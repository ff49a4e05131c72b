//! Storefront client services over the tuckshop pricing core.

use rusty_money::iso::{self, Currency};

pub mod api;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod context;
pub mod library;
pub mod local;
pub mod selections;

/// Currency all storefront prices are quoted in.
pub const STORE_CURRENCY: &Currency = iso::THB;
