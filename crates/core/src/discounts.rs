//! Discount terms
//!
//! A promotion code that resolves successfully yields [`DiscountTerms`]: the
//! value it takes off the subtotal and the smallest subtotal it applies to.
//! Codes are resolved fresh for every apply attempt; an invalid or expired
//! code yields no terms at all.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors specific to building discount terms.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percent points were not finite or fell outside 0 to 100.
    #[error("discount percent must be a finite value between 0 and 100")]
    PercentOutOfRange,
}

/// The value a promotion takes off the subtotal.
#[derive(Debug, Copy, Clone)]
pub enum DiscountValue<'a> {
    /// Take a percentage off the subtotal, stored as a fraction (10% is 0.1).
    Percent(Percentage),

    /// Subtract a fixed amount from the subtotal (e.g. "150 baht off").
    Flat(Money<'a, Currency>),
}

/// A promotion code resolved to its pricing terms.
#[derive(Debug, Copy, Clone)]
pub struct DiscountTerms<'a> {
    value: DiscountValue<'a>,
    minimum_purchase: Money<'a, Currency>,
}

impl<'a> DiscountTerms<'a> {
    /// Build percentage terms from percent points, so `10.0` means 10% off.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::PercentOutOfRange`] when `points` is not
    /// finite or falls outside 0 to 100.
    pub fn percent(
        points: f64,
        minimum_purchase: Money<'a, Currency>,
    ) -> Result<Self, DiscountError> {
        if !(0.0..=100.0).contains(&points) {
            return Err(DiscountError::PercentOutOfRange);
        }

        let points = Decimal::from_f64(points).ok_or(DiscountError::PercentOutOfRange)?;

        Ok(Self {
            value: DiscountValue::Percent(Percentage::from(points / Decimal::ONE_HUNDRED)),
            minimum_purchase,
        })
    }

    /// Build flat-amount terms.
    #[must_use]
    pub const fn flat(amount: Money<'a, Currency>, minimum_purchase: Money<'a, Currency>) -> Self {
        Self {
            value: DiscountValue::Flat(amount),
            minimum_purchase,
        }
    }

    /// The discount value.
    #[must_use]
    pub const fn value(&self) -> DiscountValue<'a> {
        self.value
    }

    /// The smallest subtotal the discount applies to.
    ///
    /// A subtotal equal to the minimum still qualifies.
    #[must_use]
    pub const fn minimum_purchase(&self) -> Money<'a, Currency> {
        self.minimum_purchase
    }
}
