//! Promotion-code endpoints.

use async_trait::async_trait;
use mockall::automock;
use reqwest::StatusCode;
use serde::Deserialize;

use tuckshop::{discounts::DiscountTerms, pricing::money_from_major_f64};

use crate::STORE_CURRENCY;

use super::{ApiError, StorefrontApi};

/// A promotion as served by `PATCH /discount`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRecord {
    /// Whether `amount` is percent points (`true`) or a flat amount in major
    /// units (`false`).
    pub is_percent: bool,

    /// Percent points or flat amount, per `is_percent`.
    pub amount: f64,

    /// Smallest qualifying subtotal in major units.
    #[serde(default)]
    pub minimum_purchase_amount: f64,
}

impl DiscountRecord {
    /// Convert the wire record into priced discount terms.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidAmount` when an amount is not representable
    /// as money, or `UnexpectedResponse` when percent points fall outside 0
    /// to 100.
    pub fn into_terms(self) -> Result<DiscountTerms<'static>, ApiError> {
        let minimum = money_from_major_f64(self.minimum_purchase_amount, STORE_CURRENCY)
            .map_err(ApiError::InvalidAmount)?;

        if self.is_percent {
            return DiscountTerms::percent(self.amount, minimum).map_err(|error| {
                ApiError::UnexpectedResponse(format!("discount terms rejected: {error}"))
            });
        }

        let amount =
            money_from_major_f64(self.amount, STORE_CURRENCY).map_err(ApiError::InvalidAmount)?;

        Ok(DiscountTerms::flat(amount, minimum))
    }
}

/// Resolution of shopper-entered promotion codes.
#[automock]
#[async_trait]
pub trait DiscountLookup: Send + Sync {
    /// Resolve a promotion code to its discount terms.
    ///
    /// `Ok(None)` means the code is invalid or expired. Terms are resolved
    /// fresh on every call and never cached across a checkout session.
    async fn resolve(&self, code: &str) -> Result<Option<DiscountTerms<'static>>, ApiError>;
}

#[async_trait]
impl DiscountLookup for StorefrontApi {
    async fn resolve(&self, code: &str) -> Result<Option<DiscountTerms<'static>>, ApiError> {
        let body = serde_json::json!({ "code": code });

        let response = self.patch("/discount").json(&body).send().await?;

        // The storefront answers an unknown code with 404.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = Self::error_for_status("discount", response).await?;
        let text = response.text().await?;

        // An empty or null body also means the code did not resolve.
        if text.trim().is_empty() || text.trim() == "null" {
            return Ok(None);
        }

        let record: DiscountRecord = serde_json::from_str(&text).map_err(|error| {
            ApiError::UnexpectedResponse(format!("discount body did not parse: {error}"))
        })?;

        record.into_terms().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::Money;
    use testresult::TestResult;
    use tuckshop::{discounts::DiscountValue, pricing::apply_discount};

    use super::*;

    #[test]
    fn percent_record_becomes_percent_terms() -> TestResult {
        let record: DiscountRecord = serde_json::from_str(
            r#"{"isPercent":true,"amount":10,"minimumPurchaseAmount":500}"#,
        )?;

        let terms = record.into_terms()?;

        assert_eq!(
            terms.minimum_purchase(),
            Money::from_minor(50_000, STORE_CURRENCY)
        );
        assert!(matches!(terms.value(), DiscountValue::Percent(_)));

        // Applying the terms to a 1000-baht subtotal takes 10% off.
        let quote = apply_discount(Some(&terms), Money::from_minor(100_000, STORE_CURRENCY))?;
        assert_eq!(quote.total(), Money::from_minor(90_000, STORE_CURRENCY));

        Ok(())
    }

    #[test]
    fn flat_record_becomes_flat_terms() -> TestResult {
        let record: DiscountRecord =
            serde_json::from_str(r#"{"isPercent":false,"amount":150}"#)?;

        let terms = record.into_terms()?;

        assert!(matches!(
            terms.value(),
            DiscountValue::Flat(amount) if amount == Money::from_minor(15_000, STORE_CURRENCY)
        ));
        assert_eq!(
            terms.minimum_purchase(),
            Money::from_minor(0, STORE_CURRENCY)
        );

        Ok(())
    }

    #[test]
    fn out_of_range_percent_is_an_unexpected_response() -> TestResult {
        let record: DiscountRecord =
            serde_json::from_str(r#"{"isPercent":true,"amount":250}"#)?;

        let result = record.into_terms();

        assert!(matches!(result, Err(ApiError::UnexpectedResponse(_))));

        Ok(())
    }

    #[test]
    fn non_finite_amount_is_an_invalid_amount() -> TestResult {
        let record = DiscountRecord {
            is_percent: false,
            amount: f64::INFINITY,
            minimum_purchase_amount: 0.0,
        };

        let result = record.into_terms();

        assert!(matches!(result, Err(ApiError::InvalidAmount(_))));

        Ok(())
    }
}
