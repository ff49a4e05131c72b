//! Cart

use rustc_hash::FxHashSet;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    plans::{PlanKind, PricePlan},
    products::ProductKey,
};

/// Errors related to cart construction.
#[derive(Debug, Error)]
pub enum CartError {
    /// A line's currency differs from the cart currency.
    #[error("Line {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// A product appears on more than one line.
    #[error("Line {0} repeats a product already in the cart")]
    DuplicateProduct(usize),
}

/// One product at one selected plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartLine<'a> {
    product: ProductKey,
    plan: PricePlan<'a>,
}

impl<'a> CartLine<'a> {
    /// Create a line for a product at the given plan.
    #[must_use]
    pub const fn new(product: ProductKey, plan: PricePlan<'a>) -> Self {
        Self { product, plan }
    }

    /// The product on this line.
    #[must_use]
    pub const fn product(&self) -> ProductKey {
        self.product
    }

    /// The selected plan.
    #[must_use]
    pub const fn plan(&self) -> PricePlan<'a> {
        self.plan
    }

    /// The cadence of the selected plan.
    #[must_use]
    pub const fn plan_kind(&self) -> PlanKind {
        self.plan.kind()
    }

    /// The unit price of the selected plan.
    #[must_use]
    pub const fn unit_price(&self) -> Money<'a, Currency> {
        self.plan.price()
    }
}

/// Cart
///
/// Lines keep their insertion order. Digital products are bought at most
/// once, so a product can appear on only one line.
#[derive(Debug)]
pub struct Cart<'a> {
    /// The lines in the cart.
    lines: Vec<CartLine<'a>>,

    /// The currency of the cart.
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create a new empty cart with a currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Create a new cart with the given lines and currency.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if any line has a different currency to the
    /// cart, or repeats a product already on an earlier line.
    pub fn with_lines(
        lines: impl Into<Vec<CartLine<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let lines = lines.into();
        let mut seen: FxHashSet<ProductKey> = FxHashSet::default();

        lines.iter().enumerate().try_for_each(|(index, line)| {
            let line_currency = line.unit_price().currency();

            if line_currency != currency {
                return Err(CartError::CurrencyMismatch(
                    index,
                    line_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            if !seen.insert(line.product()) {
                return Err(CartError::DuplicateProduct(index));
            }

            Ok(())
        })?;

        Ok(Cart { lines, currency })
    }

    /// Calculate the subtotal of the cart.
    ///
    /// An empty cart has a zero subtotal in the cart currency.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the money values cannot be added together.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.lines
            .iter()
            .try_fold(Money::from_minor(0, self.currency), |acc, line| {
                acc.add(line.unit_price())
            })
    }

    /// The number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartLine<'a>> {
        self.lines.iter()
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{self, THB, USD};
    use slotmap::SlotMap;
    use testresult::TestResult;

    use crate::plans::PlanKind;

    use super::*;

    fn mint_keys<const N: usize>() -> [ProductKey; N] {
        let mut keys: SlotMap<ProductKey, ()> = SlotMap::with_key();

        std::array::from_fn(|_| keys.insert(()))
    }

    fn line(product: ProductKey, minor: i64) -> CartLine<'static> {
        CartLine::new(
            product,
            PricePlan::new(PlanKind::OneTime, Money::from_minor(minor, THB)),
        )
    }

    #[test]
    fn new_cart_with_currency() {
        let cart = Cart::new(THB);

        assert!(cart.is_empty());
        assert_eq!(cart.currency(), iso::THB);
    }

    #[test]
    fn with_lines_accepts_matching_currencies() -> TestResult {
        let [first, second] = mint_keys();
        let cart = Cart::with_lines([line(first, 35_000), line(second, 15_000)], THB)?;

        assert_eq!(cart.len(), 2);
        assert!(!cart.is_empty());

        Ok(())
    }

    #[test]
    fn with_lines_rejects_currency_mismatch() {
        let [first, second] = mint_keys();
        let lines = [
            line(first, 35_000),
            CartLine::new(
                second,
                PricePlan::new(PlanKind::Monthly, Money::from_minor(999, USD)),
            ),
        ];

        let result = Cart::with_lines(lines, THB);

        match result {
            Err(CartError::CurrencyMismatch(index, line_currency, cart_currency)) => {
                assert_eq!(index, 1);
                assert_eq!(line_currency, iso::USD.iso_alpha_code);
                assert_eq!(cart_currency, iso::THB.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn with_lines_rejects_repeated_product() {
        let [only] = mint_keys();
        let result = Cart::with_lines([line(only, 35_000), line(only, 15_000)], THB);

        match result {
            Err(CartError::DuplicateProduct(index)) => assert_eq!(index, 1),
            other => panic!("expected DuplicateProduct error, got {other:?}"),
        }
    }

    #[test]
    fn subtotal_sums_line_prices() -> TestResult {
        let [first, second, third] = mint_keys();
        let cart = Cart::with_lines(
            [line(first, 35_000), line(second, 15_000), line(third, 50_000)],
            THB,
        )?;

        assert_eq!(cart.subtotal()?, Money::from_minor(100_000, THB));

        Ok(())
    }

    #[test]
    fn subtotal_of_empty_cart_is_zero() -> TestResult {
        let cart = Cart::new(THB);

        assert_eq!(cart.subtotal()?, Money::from_minor(0, THB));

        Ok(())
    }

    #[test]
    fn subtotal_is_stable_across_calls() -> TestResult {
        let [first, second] = mint_keys();
        let cart = Cart::with_lines([line(first, 19_900), line(second, 9_900)], THB)?;

        assert_eq!(cart.subtotal()?, cart.subtotal()?);

        Ok(())
    }

    #[test]
    fn lines_keep_insertion_order() -> TestResult {
        let [first, second] = mint_keys();
        let cart = Cart::with_lines([line(first, 100), line(second, 200)], THB)?;

        let products: Vec<ProductKey> = cart.iter().map(CartLine::product).collect();

        assert_eq!(products, [first, second]);

        Ok(())
    }
}
