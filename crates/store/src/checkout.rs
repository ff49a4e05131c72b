//! Quote and order placement flow.
//!
//! [`Checkout`] ties the pricing core to the storefront: it resolves the
//! shopper's promotion code into terms, prices the cart into a [`Quote`],
//! and submits the order once the quote is in a submittable state. Payment
//! details are validated locally before anything leaves the machine; the
//! storefront only ever sees the chosen payment method, never the card.

use std::{fmt, sync::Arc};

use jiff::Zoned;
use thiserror::Error;
use tracing::warn;
use zeroize::Zeroize;

use tuckshop::{
    cart::Cart,
    payment::{CardError, Expiry, is_valid_card_number, is_valid_cvv},
    pricing::{PricingError, PricingStatus, Quote, apply_discount},
};

use crate::{
    api::{
        ApiError,
        discounts::DiscountLookup,
        orders::{NewOrder, OrderConfirmation, OrderLine, OrdersService},
    },
    catalog::Catalog,
};

/// Card fields as the shopper entered them.
///
/// The fields are zeroed on drop and never appear in debug output.
#[derive(Clone)]
pub struct CardDetails {
    number: String,
    expiry: String,
    cvv: String,
}

impl CardDetails {
    /// Capture card fields for validation.
    pub fn new(
        number: impl Into<String>,
        expiry: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            expiry: expiry.into(),
            cvv: cvv.into(),
        }
    }

    /// Check every field, in entry order, against the given date.
    ///
    /// The first failing field decides the error: number, then expiration,
    /// then security code.
    ///
    /// # Errors
    ///
    /// Returns the [`CardError`] for the first field that fails.
    pub fn validate(&self, today: jiff::civil::Date) -> Result<(), CardError> {
        if !is_valid_card_number(&self.number) {
            return Err(CardError::InvalidCardNumber);
        }

        let expiry: Expiry = self.expiry.parse()?;

        if !expiry.is_valid_at(today) {
            return Err(CardError::InvalidExpiration);
        }

        if !is_valid_cvv(&self.cvv) {
            return Err(CardError::InvalidCvv);
        }

        Ok(())
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CardDetails(**redacted**)")
    }
}

impl Drop for CardDetails {
    fn drop(&mut self) {
        self.number.zeroize();
        self.expiry.zeroize();
        self.cvv.zeroize();
    }
}

/// How the shopper wants to pay.
#[derive(Debug, Clone)]
pub enum PaymentMethod {
    /// Credit or debit card, validated locally before submission.
    Card(CardDetails),

    /// Bank transfer settled out of band.
    BankTransfer,
}

impl PaymentMethod {
    /// Wire name the storefront expects for this method.
    #[must_use]
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Self::Card(_) => "card",
            Self::BankTransfer => "bankTransfer",
        }
    }
}

/// Error quoting or placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The quote is not in a state that allows submission.
    #[error("order cannot be placed while the quote status is {0:?}")]
    QuoteNotSubmittable(PricingStatus),

    /// A payment field failed validation.
    #[error(transparent)]
    Payment(#[from] CardError),

    /// Pricing the cart failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The storefront API failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A carted product is not in the session catalog.
    #[error("a carted product is unknown to the catalog")]
    UnknownProduct,
}

/// Checkout flow over the storefront's discount and order endpoints.
#[derive(Clone)]
pub struct Checkout {
    discounts: Arc<dyn DiscountLookup>,
    orders: Arc<dyn OrdersService>,
}

impl Checkout {
    /// Build a checkout over the given services.
    pub fn new(discounts: Arc<dyn DiscountLookup>, orders: Arc<dyn OrdersService>) -> Self {
        Self { discounts, orders }
    }

    /// Price the cart, resolving the promotion code when one was entered.
    ///
    /// A blank code counts as no code at all. A lookup failure is logged and
    /// degrades to the invalid-code outcome rather than blocking the quote;
    /// the shopper can still check out at full price.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart itself cannot be priced.
    pub async fn quote(
        &self,
        cart: &Cart<'static>,
        code: Option<&str>,
    ) -> Result<Quote<'static>, CheckoutError> {
        let subtotal = cart.subtotal().map_err(PricingError::from)?;

        let Some(code) = normalize_code(code) else {
            return Ok(Quote::without_code(subtotal));
        };

        let terms = match self.discounts.resolve(code).await {
            Ok(terms) => terms,
            Err(error) => {
                warn!("promotion code lookup failed, treating code as invalid: {error}");
                None
            }
        };

        Ok(apply_discount(terms.as_ref(), subtotal)?)
    }

    /// Submit the order behind a quote.
    ///
    /// The quote must be submittable: either no code was entered or the code
    /// applied. Card payments are validated against today's date before the
    /// order goes out.
    ///
    /// # Errors
    ///
    /// Returns an error when the quote is not submittable, a payment field
    /// is invalid, a carted product is unknown, or the storefront rejects
    /// the order.
    pub async fn place_order(
        &self,
        cart: &Cart<'static>,
        catalog: &Catalog,
        quote: &Quote<'static>,
        code: Option<&str>,
        payment: &PaymentMethod,
    ) -> Result<OrderConfirmation, CheckoutError> {
        if !quote.is_submittable() {
            return Err(CheckoutError::QuoteNotSubmittable(quote.status()));
        }

        if let PaymentMethod::Card(card) = payment {
            card.validate(Zoned::now().date())?;
        }

        let mut products = Vec::with_capacity(cart.len());

        for line in cart.iter() {
            let product_id = catalog
                .id_for(line.product())
                .ok_or(CheckoutError::UnknownProduct)?;

            products.push(OrderLine {
                product_id: product_id.to_string(),
                plan: line.plan_kind(),
            });
        }

        let order = NewOrder {
            products,
            promo_code: normalize_code(code).map(str::to_string),
            payment_method: payment.wire_name().to_string(),
        };

        Ok(self.orders.place_order(order).await?)
    }
}

/// One-line status message for a quote, empty when there is nothing to say.
#[must_use]
pub const fn status_line(quote: &Quote<'_>) -> &'static str {
    match quote.status() {
        PricingStatus::NoCodeEntered => "",
        PricingStatus::CodeInvalidOrExpired => "This promotion code is invalid or has expired.",
        PricingStatus::BelowMinimumPurchase => {
            "Your order does not reach the minimum for this promotion code."
        }
        PricingStatus::Applied => "Promotion code applied.",
    }
}

/// Treat blank input as no code.
fn normalize_code(code: Option<&str>) -> Option<&str> {
    code.map(str::trim).filter(|code| !code.is_empty())
}
