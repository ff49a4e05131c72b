//! Server-side cart endpoints.
//!
//! Signed-in shoppers keep their cart on the storefront so it follows them
//! across devices. The wire format is the same [`SavedSelection`] record the
//! local state file uses.

use async_trait::async_trait;
use reqwest::StatusCode;

use tuckshop::plans::PlanKind;

use crate::selections::{SavedSelection, SelectionStore, SelectionStoreError};

use super::{ApiError, StorefrontApi};

#[async_trait]
impl SelectionStore for StorefrontApi {
    async fn selections(&self) -> Result<Vec<SavedSelection>, SelectionStoreError> {
        let response = self
            .get("/cart")
            .send()
            .await
            .map_err(ApiError::Http)?;

        let response = Self::error_for_status("cart", response).await?;
        let selections = response.json().await.map_err(ApiError::Http)?;

        Ok(selections)
    }

    async fn add(&self, selection: SavedSelection) -> Result<(), SelectionStoreError> {
        let response = self
            .post("/cart")
            .json(&selection)
            .send()
            .await
            .map_err(ApiError::Http)?;

        Self::error_for_status("cart", response).await?;

        Ok(())
    }

    async fn set_plan(&self, product_id: &str, plan: PlanKind) -> Result<(), SelectionStoreError> {
        let body = serde_json::json!({ "productId": product_id, "plan": plan });

        let response = self
            .patch("/cart")
            .json(&body)
            .send()
            .await
            .map_err(ApiError::Http)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SelectionStoreError::NotFound);
        }

        Self::error_for_status("cart", response).await?;

        Ok(())
    }

    async fn remove(&self, product_id: &str) -> Result<(), SelectionStoreError> {
        let response = self
            .delete(&format!("/cart/{product_id}"))
            .send()
            .await
            .map_err(ApiError::Http)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SelectionStoreError::NotFound);
        }

        Self::error_for_status("cart", response).await?;

        Ok(())
    }
}
