//! Quote pricing
//!
//! [`apply_discount`] turns a subtotal and an optionally resolved promotion
//! code into a [`Quote`]. The evaluation order is fixed: unresolved terms
//! first, then the minimum purchase, then the arithmetic. Totals are rounded
//! to whole display-currency units, floored at zero, and the discount is
//! always whatever the rounding left off the subtotal, so the three amounts
//! stay consistent.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::discounts::{DiscountTerms, DiscountValue};

/// Errors that can occur while pricing a quote.
#[derive(Debug, Error)]
pub enum PricingError {
    /// A monetary value could not be safely represented in decimal space.
    #[error("amount conversion overflowed or was not finite")]
    AmountConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Outcome of a promotion-code evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingStatus {
    /// No code was entered; the subtotal stands.
    NoCodeEntered,

    /// The code did not resolve to an active promotion.
    CodeInvalidOrExpired,

    /// The subtotal does not reach the promotion's minimum purchase.
    BelowMinimumPurchase,

    /// The discount was applied.
    Applied,
}

/// A priced checkout quote.
///
/// Holds the subtotal, the discount taken off it, the resulting total, and
/// the status of the promotion-code evaluation that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote<'a> {
    subtotal: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    total: Money<'a, Currency>,
    status: PricingStatus,
}

impl<'a> Quote<'a> {
    /// Quote for a checkout where no promotion code was entered.
    #[must_use]
    pub fn without_code(subtotal: Money<'a, Currency>) -> Self {
        unchanged(subtotal, PricingStatus::NoCodeEntered)
    }

    /// The subtotal before any discount.
    #[must_use]
    pub const fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// The amount taken off the subtotal.
    #[must_use]
    pub const fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// The amount left to pay.
    #[must_use]
    pub const fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// The promotion-code evaluation outcome.
    #[must_use]
    pub const fn status(&self) -> PricingStatus {
        self.status
    }

    /// Whether an order may be placed from this quote.
    ///
    /// Orders go through only when no code was entered or the code applied;
    /// an invalid code or an unmet minimum blocks submission until the
    /// shopper clears or fixes the code.
    #[must_use]
    pub const fn is_submittable(&self) -> bool {
        matches!(
            self.status,
            PricingStatus::NoCodeEntered | PricingStatus::Applied
        )
    }
}

/// Evaluate resolved promotion terms (or the lack of them) against a subtotal.
///
/// `None` terms mean the code did not resolve; the subtotal stands and the
/// quote carries [`PricingStatus::CodeInvalidOrExpired`]. Resolved terms are
/// then gated on their minimum purchase, where a subtotal equal to the
/// minimum still qualifies. Past both gates the discount applies: the total
/// is the discounted subtotal rounded half-away-from-zero to a whole unit of
/// the currency, never below zero, and the discount is whatever that leaves
/// off the subtotal.
///
/// # Errors
///
/// Returns a [`PricingError`] if a decimal conversion overflows, or the
/// terms carry money in a different currency to the subtotal.
pub fn apply_discount<'a>(
    terms: Option<&DiscountTerms<'a>>,
    subtotal: Money<'a, Currency>,
) -> Result<Quote<'a>, PricingError> {
    let Some(terms) = terms else {
        return Ok(unchanged(subtotal, PricingStatus::CodeInvalidOrExpired));
    };

    ensure_same_currency(&subtotal, &terms.minimum_purchase())?;

    if subtotal.to_minor_units() < terms.minimum_purchase().to_minor_units() {
        return Ok(unchanged(subtotal, PricingStatus::BelowMinimumPurchase));
    }

    let discounted = match terms.value() {
        DiscountValue::Percent(percent) => {
            let minor = Decimal::from_i64(subtotal.to_minor_units())
                .ok_or(PricingError::AmountConversion)?;

            // decimal_percentage doesn't expose the underlying Decimal
            let fraction = percent * Decimal::ONE;

            Decimal::ONE
                .checked_sub(fraction)
                .ok_or(PricingError::AmountConversion)?
                .checked_mul(minor)
                .ok_or(PricingError::AmountConversion)?
        }
        DiscountValue::Flat(amount) => {
            let after = subtotal.sub(amount)?;

            Decimal::from_i64(after.to_minor_units()).ok_or(PricingError::AmountConversion)?
        }
    };

    let currency = subtotal.currency();
    let total_minor =
        round_to_unit_minor(discounted, currency)?.clamp(0, subtotal.to_minor_units().max(0));

    let total = Money::from_minor(total_minor, currency);
    let discount = subtotal.sub(total)?;

    Ok(Quote {
        subtotal,
        discount,
        total,
        status: PricingStatus::Applied,
    })
}

/// Convert a decimal amount in major units (e.g. `350.0` baht) to [`Money`].
///
/// Storefront wire formats carry amounts as JSON numbers in major units; the
/// fractional part maps to minor units, rounded half-away-from-zero at the
/// currency's exponent.
///
/// # Errors
///
/// Returns [`PricingError::AmountConversion`] if `amount` is not finite or
/// does not fit in minor units.
pub fn money_from_major_f64(
    amount: f64,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let amount = Decimal::from_f64_retain(amount).ok_or(PricingError::AmountConversion)?;
    let unit = minor_units_per_major(currency)?;

    let minor = amount
        .checked_mul(unit)
        .ok_or(PricingError::AmountConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::AmountConversion)?;

    Ok(Money::from_minor(minor, currency))
}

/// A quote that leaves the subtotal untouched.
fn unchanged<'a>(subtotal: Money<'a, Currency>, status: PricingStatus) -> Quote<'a> {
    Quote {
        subtotal,
        discount: Money::from_minor(0, subtotal.currency()),
        total: subtotal,
        status,
    }
}

fn ensure_same_currency(
    subtotal: &Money<'_, Currency>,
    other: &Money<'_, Currency>,
) -> Result<(), PricingError> {
    if subtotal.currency() == other.currency() {
        return Ok(());
    }

    Err(PricingError::Money(MoneyError::CurrencyMismatch {
        expected: subtotal.currency().iso_alpha_code,
        actual: other.currency().iso_alpha_code,
    }))
}

/// Round a minor-unit amount half-away-from-zero to a whole major unit.
///
/// Display prices on the storefront are whole units (whole baht), so totals
/// land on a unit boundary even when the discount arithmetic does not.
fn round_to_unit_minor(minor: Decimal, currency: &Currency) -> Result<i64, PricingError> {
    let unit = minor_units_per_major(currency)?;

    (minor / unit)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(unit)
        .ok_or(PricingError::AmountConversion)?
        .to_i64()
        .ok_or(PricingError::AmountConversion)
}

fn minor_units_per_major(currency: &Currency) -> Result<Decimal, PricingError> {
    let unit = 10_i64
        .checked_pow(currency.exponent)
        .ok_or(PricingError::AmountConversion)?;

    Decimal::from_i64(unit).ok_or(PricingError::AmountConversion)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{THB, USD};
    use testresult::TestResult;

    use super::*;

    fn thb(minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, THB)
    }

    #[test]
    fn unresolved_terms_keep_the_subtotal_and_flag_the_code() -> TestResult {
        let quote = apply_discount(None, thb(100_000))?;

        assert_eq!(quote.subtotal(), thb(100_000));
        assert_eq!(quote.discount(), thb(0));
        assert_eq!(quote.total(), thb(100_000));
        assert_eq!(quote.status(), PricingStatus::CodeInvalidOrExpired);

        Ok(())
    }

    #[test]
    fn ten_percent_off_a_thousand_baht() -> TestResult {
        let terms = DiscountTerms::percent(10.0, thb(0))?;
        let quote = apply_discount(Some(&terms), thb(100_000))?;

        assert_eq!(quote.discount(), thb(10_000));
        assert_eq!(quote.total(), thb(90_000));
        assert_eq!(quote.status(), PricingStatus::Applied);

        Ok(())
    }

    #[test]
    fn flat_hundred_fifty_off_a_thousand_baht() -> TestResult {
        let terms = DiscountTerms::flat(thb(15_000), thb(0));
        let quote = apply_discount(Some(&terms), thb(100_000))?;

        assert_eq!(quote.discount(), thb(15_000));
        assert_eq!(quote.total(), thb(85_000));
        assert_eq!(quote.status(), PricingStatus::Applied);

        Ok(())
    }

    #[test]
    fn subtotal_below_minimum_is_not_discounted() -> TestResult {
        let terms = DiscountTerms::percent(10.0, thb(50_000))?;
        let quote = apply_discount(Some(&terms), thb(10_000))?;

        assert_eq!(quote.discount(), thb(0));
        assert_eq!(quote.total(), thb(10_000));
        assert_eq!(quote.status(), PricingStatus::BelowMinimumPurchase);

        Ok(())
    }

    #[test]
    fn subtotal_equal_to_minimum_still_qualifies() -> TestResult {
        let terms = DiscountTerms::percent(10.0, thb(50_000))?;
        let quote = apply_discount(Some(&terms), thb(50_000))?;

        assert_eq!(quote.status(), PricingStatus::Applied);
        assert_eq!(quote.total(), thb(45_000));

        Ok(())
    }

    /// 15% off 990 leaves 841.50, which rounds away from zero to 842 whole
    /// baht; the discount is the 148 the rounding left off.
    #[test]
    fn percent_totals_round_half_away_from_zero_to_whole_units() -> TestResult {
        let terms = DiscountTerms::percent(15.0, thb(0))?;
        let quote = apply_discount(Some(&terms), thb(99_000))?;

        assert_eq!(quote.total(), thb(84_200));
        assert_eq!(quote.discount(), thb(14_800));

        Ok(())
    }

    #[test]
    fn flat_discount_larger_than_subtotal_floors_the_total_at_zero() -> TestResult {
        let terms = DiscountTerms::flat(thb(150_000), thb(0));
        let quote = apply_discount(Some(&terms), thb(100_000))?;

        assert_eq!(quote.total(), thb(0));
        assert_eq!(quote.discount(), thb(100_000));
        assert_eq!(quote.status(), PricingStatus::Applied);

        Ok(())
    }

    #[test]
    fn hundred_percent_zeroes_the_total() -> TestResult {
        let terms = DiscountTerms::percent(100.0, thb(0))?;
        let quote = apply_discount(Some(&terms), thb(35_000))?;

        assert_eq!(quote.total(), thb(0));
        assert_eq!(quote.discount(), thb(35_000));

        Ok(())
    }

    #[test]
    fn flat_terms_in_another_currency_error() -> TestResult {
        let terms = DiscountTerms::flat(Money::from_minor(500, USD), thb(0));
        let result = apply_discount(Some(&terms), thb(100_000));

        assert!(matches!(result, Err(PricingError::Money(_))));

        Ok(())
    }

    #[test]
    fn minimum_in_another_currency_errors() {
        let terms = DiscountTerms::flat(thb(500), Money::from_minor(500, USD));
        let result = apply_discount(Some(&terms), thb(100_000));

        assert!(matches!(
            result,
            Err(PricingError::Money(MoneyError::CurrencyMismatch { .. }))
        ));
    }

    #[test]
    fn quote_without_code_keeps_the_subtotal() {
        let quote = Quote::without_code(thb(70_000));

        assert_eq!(quote.total(), thb(70_000));
        assert_eq!(quote.discount(), thb(0));
        assert_eq!(quote.status(), PricingStatus::NoCodeEntered);
    }

    #[test]
    fn only_clean_statuses_are_submittable() -> TestResult {
        assert!(Quote::without_code(thb(100)).is_submittable());

        let applied = apply_discount(Some(&DiscountTerms::percent(5.0, thb(0))?), thb(10_000))?;
        assert!(applied.is_submittable());

        let invalid = apply_discount(None, thb(100))?;
        assert!(!invalid.is_submittable());

        let below = apply_discount(Some(&DiscountTerms::percent(5.0, thb(999))?), thb(100))?;
        assert!(!below.is_submittable());

        Ok(())
    }

    #[test]
    fn major_amounts_convert_to_minor_units() -> TestResult {
        assert_eq!(money_from_major_f64(350.0, THB)?, thb(35_000));
        assert_eq!(money_from_major_f64(19.99, THB)?, thb(1_999));
        assert_eq!(money_from_major_f64(0.0, THB)?, thb(0));

        Ok(())
    }

    #[test]
    fn unrepresentable_major_amounts_error() {
        for amount in [f64::NAN, f64::INFINITY, 1e18] {
            let result = money_from_major_f64(amount, THB);

            assert!(matches!(result, Err(PricingError::AmountConversion)));
        }
    }
}
