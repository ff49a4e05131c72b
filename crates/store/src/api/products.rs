//! Catalog endpoints.

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;

use tuckshop::plans::PlanKind;

use super::{ApiError, StorefrontApi};

/// A product as served by `GET /product`.
///
/// Prices are JSON numbers in major units (whole baht with an optional
/// fractional part); a missing price means the cadence is not offered.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Opaque product id.
    pub id: String,

    /// Display title.
    pub title: String,

    /// One-time purchase price, if offered.
    #[serde(default)]
    pub one_time_price: Option<f64>,

    /// Monthly plan price, if offered.
    #[serde(default)]
    pub monthly_price: Option<f64>,

    /// Yearly plan price, if offered.
    #[serde(default)]
    pub yearly_price: Option<f64>,
}

impl ProductRecord {
    /// Whether the product is offered on the given cadence.
    #[must_use]
    pub const fn offers(&self, kind: PlanKind) -> bool {
        match kind {
            PlanKind::OneTime => self.one_time_price.is_some(),
            PlanKind::Monthly => self.monthly_price.is_some(),
            PlanKind::Yearly => self.yearly_price.is_some(),
        }
    }

    /// The cadence preselected when this product is added without an
    /// explicit choice: the first offered of one-time, monthly, yearly.
    #[must_use]
    pub const fn default_plan_kind(&self) -> Option<PlanKind> {
        if self.one_time_price.is_some() {
            Some(PlanKind::OneTime)
        } else if self.monthly_price.is_some() {
            Some(PlanKind::Monthly)
        } else if self.yearly_price.is_some() {
            Some(PlanKind::Yearly)
        } else {
            None
        }
    }
}

/// Read access to the product catalog.
#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Fetch the full product catalog.
    async fn fetch_products(&self) -> Result<Vec<ProductRecord>, ApiError>;

    /// Fetch a single product by its id.
    async fn fetch_product(&self, id: &str) -> Result<ProductRecord, ApiError>;
}

#[async_trait]
impl ProductsService for StorefrontApi {
    async fn fetch_products(&self) -> Result<Vec<ProductRecord>, ApiError> {
        let response = self.get("/product").send().await?;
        let response = Self::error_for_status("product list", response).await?;

        Ok(response.json().await?)
    }

    async fn fetch_product(&self, id: &str) -> Result<ProductRecord, ApiError> {
        let response = self.get(&format!("/product/{id}")).send().await?;
        let response = Self::error_for_status("product", response).await?;

        Ok(response.json().await?)
    }
}
