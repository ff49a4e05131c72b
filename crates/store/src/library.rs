//! The shopper's library of purchased products.

use jiff::Timestamp;
use serde::Deserialize;
use uuid::Uuid;

use tuckshop::plans::PlanKind;

/// One purchased product as served by `GET /order`.
///
/// Subscription purchases carry the end of their paid period in
/// `expires_at`; one-time purchases never expire and omit it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    /// Order the purchase belongs to.
    pub order_id: Uuid,

    /// Storefront product id.
    pub product_id: String,

    /// Product title at the time of purchase.
    pub title: String,

    /// Cadence the product was bought on.
    pub plan: PlanKind,

    /// End of the paid period, absent for one-time purchases.
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

impl LibraryEntry {
    /// Whether this purchase still grants access at the given instant.
    #[must_use]
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.expires_at.is_none_or(|expires| expires > now)
    }
}

/// Split entries into those still granting access and those lapsed.
///
/// Both halves keep their served order.
#[must_use]
pub fn partition_active(
    entries: Vec<LibraryEntry>,
    now: Timestamp,
) -> (Vec<LibraryEntry>, Vec<LibraryEntry>) {
    entries
        .into_iter()
        .partition(|entry| entry.is_active_at(now))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn entry(product_id: &str, plan: PlanKind, expires_at: Option<&str>) -> Result<LibraryEntry, jiff::Error> {
        Ok(LibraryEntry {
            order_id: Uuid::nil(),
            product_id: product_id.into(),
            title: product_id.to_uppercase(),
            plan,
            expires_at: expires_at.map(str::parse).transpose()?,
        })
    }

    #[test]
    fn entry_parses_with_and_without_expiry() -> TestResult {
        let with: LibraryEntry = serde_json::from_str(
            r#"{
                "orderId": "0191b6a8-55aa-7bbd-8001-7d4f2a9c63c1",
                "productId": "prod_2",
                "title": "Math Safari",
                "plan": "monthly",
                "expiresAt": "2026-09-25T00:00:00Z"
            }"#,
        )?;

        assert_eq!(with.plan, PlanKind::Monthly);
        assert_eq!(with.expires_at, Some("2026-09-25T00:00:00Z".parse()?));

        let without: LibraryEntry = serde_json::from_str(
            r#"{
                "orderId": "0191b6a8-55aa-7bbd-8001-7d4f2a9c63c1",
                "productId": "prod_1",
                "title": "Phonics Adventure",
                "plan": "oneTime"
            }"#,
        )?;

        assert_eq!(without.expires_at, None);

        Ok(())
    }

    #[test]
    fn one_time_purchases_never_lapse() -> TestResult {
        let entry = entry("prod_1", PlanKind::OneTime, None)?;

        assert!(entry.is_active_at("2126-01-01T00:00:00Z".parse()?));

        Ok(())
    }

    #[test]
    fn subscription_lapses_at_its_expiry_instant() -> TestResult {
        let entry = entry("prod_2", PlanKind::Monthly, Some("2026-09-25T00:00:00Z"))?;

        assert!(entry.is_active_at("2026-09-24T23:59:59Z".parse()?));
        assert!(!entry.is_active_at("2026-09-25T00:00:00Z".parse()?));

        Ok(())
    }

    #[test]
    fn partition_keeps_served_order_in_both_halves() -> TestResult {
        let now: Timestamp = "2026-08-25T00:00:00Z".parse()?;
        let entries = vec![
            entry("prod_1", PlanKind::OneTime, None)?,
            entry("prod_2", PlanKind::Monthly, Some("2026-01-01T00:00:00Z"))?,
            entry("prod_3", PlanKind::Yearly, Some("2027-01-01T00:00:00Z"))?,
        ];

        let (active, expired) = partition_active(entries, now);

        assert_eq!(
            active.iter().map(|e| e.product_id.as_str()).collect::<Vec<_>>(),
            ["prod_1", "prod_3"]
        );
        assert_eq!(
            expired.iter().map(|e| e.product_id.as_str()).collect::<Vec<_>>(),
            ["prod_2"]
        );

        Ok(())
    }
}
