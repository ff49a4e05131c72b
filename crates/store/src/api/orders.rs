//! Order placement and purchase history endpoints.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tuckshop::plans::PlanKind;

use crate::library::LibraryEntry;

use super::{ApiError, StorefrontApi};

/// One purchased product and the plan it was bought on.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Storefront product id.
    pub product_id: String,

    /// Plan cadence the shopper chose.
    pub plan: PlanKind,
}

/// Payload for `POST /order`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Every line in the cart at the time of checkout.
    pub products: Vec<OrderLine>,

    /// Promotion code as the shopper entered it, when one applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,

    /// Payment method wire name, e.g. `"card"`.
    pub payment_method: String,
}

/// Acknowledgement returned by the storefront for a placed order.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct OrderConfirmation {
    /// Server-assigned order id.
    pub id: Uuid,
}

/// Order placement and the shopper's purchase history.
#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Submit an order for the given lines.
    async fn place_order(&self, order: NewOrder) -> Result<OrderConfirmation, ApiError>;

    /// Fetch every product the shopper has purchased.
    async fn list_purchases(&self) -> Result<Vec<LibraryEntry>, ApiError>;
}

#[async_trait]
impl OrdersService for StorefrontApi {
    async fn place_order(&self, order: NewOrder) -> Result<OrderConfirmation, ApiError> {
        let response = self.post("/order").json(&order).send().await?;

        let response = Self::error_for_status("order", response).await?;
        let confirmation = response.json().await?;

        Ok(confirmation)
    }

    async fn list_purchases(&self) -> Result<Vec<LibraryEntry>, ApiError> {
        let response = self.get("/order").send().await?;

        let response = Self::error_for_status("order", response).await?;
        let entries = response.json().await?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn order_without_code_omits_the_promo_field() -> TestResult {
        let order = NewOrder {
            products: vec![OrderLine {
                product_id: "prod_123".into(),
                plan: PlanKind::Monthly,
            }],
            promo_code: None,
            payment_method: "card".into(),
        };

        let value = serde_json::to_value(&order)?;

        assert_eq!(
            value,
            serde_json::json!({
                "products": [{ "productId": "prod_123", "plan": "monthly" }],
                "paymentMethod": "card",
            })
        );

        Ok(())
    }

    #[test]
    fn order_with_code_carries_it_verbatim() -> TestResult {
        let order = NewOrder {
            products: vec![OrderLine {
                product_id: "prod_123".into(),
                plan: PlanKind::OneTime,
            }],
            promo_code: Some("SAVE10".into()),
            payment_method: "bankTransfer".into(),
        };

        let value = serde_json::to_value(&order)?;

        assert_eq!(
            value,
            serde_json::json!({
                "products": [{ "productId": "prod_123", "plan": "oneTime" }],
                "promoCode": "SAVE10",
                "paymentMethod": "bankTransfer",
            })
        );

        Ok(())
    }

    #[test]
    fn confirmation_parses_the_order_id() -> TestResult {
        let confirmation: OrderConfirmation =
            serde_json::from_str(r#"{"id":"0191b6a8-55aa-7bbd-8001-7d4f2a9c63c1"}"#)?;

        assert_eq!(
            confirmation.id,
            "0191b6a8-55aa-7bbd-8001-7d4f2a9c63c1".parse::<Uuid>()?
        );

        Ok(())
    }
}
