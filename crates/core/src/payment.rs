//! Payment field validation
//!
//! Pure checks over the card fields a shopper types at checkout: the Luhn
//! checksum for card numbers, `YYYY-MM` expiration dates compared against a
//! caller-supplied date, and the security code length. Nothing here talks to
//! a payment provider; these gates only stop obviously bad input before an
//! order is submitted.

use std::str::FromStr;

use jiff::civil::Date;
use thiserror::Error;

/// Card validation failures, one per field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardError {
    /// The card number failed the length gate or the Luhn checksum.
    #[error("invalid credit card number")]
    InvalidCardNumber,

    /// The expiration date is malformed or already past.
    #[error("invalid or past expiration date")]
    InvalidExpiration,

    /// The security code is not 3 or 4 digits.
    #[error("invalid security code")]
    InvalidCvv,
}

/// Check a card number with the Luhn algorithm.
///
/// Only strings of 13 to 19 ASCII digits are considered; anything else is
/// invalid before any checksum work. From the second-from-right digit every
/// other digit is doubled, doubles above 9 drop by 9, and the number passes
/// when the digit sum is a multiple of ten.
#[must_use]
pub fn is_valid_card_number(number: &str) -> bool {
    if !(13..=19).contains(&number.len()) || !number.bytes().all(|byte| byte.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = number
        .bytes()
        .rev()
        .enumerate()
        .map(|(position, byte)| {
            let digit = u32::from(byte - b'0');

            if position % 2 == 1 {
                let doubled = digit * 2;

                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}

/// Check a card security code: exactly 3 or 4 ASCII digits.
#[must_use]
pub fn is_valid_cvv(cvv: &str) -> bool {
    matches!(cvv.len(), 3 | 4) && cvv.bytes().all(|byte| byte.is_ascii_digit())
}

/// A card expiration month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    year: i16,
    month: i8,
}

impl Expiry {
    /// Build an expiry from a year and 1-based month.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::InvalidExpiration`] when the month falls outside
    /// 1 to 12.
    pub fn new(year: i16, month: i8) -> Result<Self, CardError> {
        if !(1..=12).contains(&month) {
            return Err(CardError::InvalidExpiration);
        }

        Ok(Self { year, month })
    }

    /// The expiry year.
    #[must_use]
    pub const fn year(&self) -> i16 {
        self.year
    }

    /// The expiry month, 1-based.
    #[must_use]
    pub const fn month(&self) -> i8 {
        self.month
    }

    /// Whether the card is still usable on the given date.
    ///
    /// A card expires at the end of its expiry month, so a card expiring in
    /// the current month is still valid. The date is always supplied by the
    /// caller; nothing is captured when the expiry is built.
    #[must_use]
    pub fn is_valid_at(&self, today: Date) -> bool {
        (self.year, self.month) >= (today.year(), today.month())
    }
}

impl FromStr for Expiry {
    type Err = CardError;

    /// Parse an expiry in `YYYY-MM` form, e.g. `"2027-04"`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (year, month) = value.split_once('-').ok_or(CardError::InvalidExpiration)?;

        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|byte| byte.is_ascii_digit())
            || !month.bytes().all(|byte| byte.is_ascii_digit())
        {
            return Err(CardError::InvalidExpiration);
        }

        let year: i16 = year.parse().map_err(|_err| CardError::InvalidExpiration)?;
        let month: i8 = month.parse().map_err(|_err| CardError::InvalidExpiration)?;

        Self::new(year, month)
    }
}
