//! Saved cart selections and their reconciliation against the catalog.
//!
//! A cart is persisted as a list of [`SavedSelection`] records, either on the
//! storefront (signed in) or in the local state file (anonymous). Saved data
//! can go stale while the shopper is away: products get retired, a cadence
//! stops being offered, prices move. [`reconcile`] replays the saved records
//! against the current catalog so the cart the shopper sees is always priced
//! from live data.

use std::collections::hash_map::Entry;

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use tuckshop::{cart::CartLine, plans::PlanKind, products::ProductKey};

use crate::{api::ApiError, catalog::Catalog, local::LocalStoreError};

/// One product saved in the cart with its chosen cadence.
///
/// The same record is the wire format of the server-side cart and the row
/// format of the local state file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SavedSelection {
    /// Storefront product id.
    pub product_id: String,

    /// Cadence the shopper chose.
    pub plan: PlanKind,
}

impl SavedSelection {
    /// Build a selection for the given product and cadence.
    pub fn new(product_id: impl Into<String>, plan: PlanKind) -> Self {
        Self {
            product_id: product_id.into(),
            plan,
        }
    }
}

/// Error working against a cart store.
#[derive(Debug, Error)]
pub enum SelectionStoreError {
    /// The storefront API failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The local state file failed.
    #[error(transparent)]
    Local(#[from] LocalStoreError),

    /// The product is not in the cart.
    #[error("product is not in the cart")]
    NotFound,
}

/// Persistence for the shopper's cart selections.
///
/// Implemented by the storefront API for signed-in shoppers and by the local
/// state file for anonymous ones. Callers never need to know which is behind
/// the handle.
#[automock]
#[async_trait]
pub trait SelectionStore: Send + Sync {
    /// Every saved selection, in saved order.
    async fn selections(&self) -> Result<Vec<SavedSelection>, SelectionStoreError>;

    /// Save a selection, replacing any earlier one for the same product.
    async fn add(&self, selection: SavedSelection) -> Result<(), SelectionStoreError>;

    /// Change the cadence of a product already in the cart.
    async fn set_plan(&self, product_id: &str, plan: PlanKind) -> Result<(), SelectionStoreError>;

    /// Remove a product from the cart.
    async fn remove(&self, product_id: &str) -> Result<(), SelectionStoreError>;
}

/// Outcome of replaying saved selections against the catalog.
#[derive(Debug, Clone, Default)]
pub struct Reconciled {
    /// Cart lines priced from the current catalog.
    pub lines: Vec<CartLine<'static>>,

    /// Product ids that could no longer be carted.
    pub dropped: SmallVec<[String; 4]>,
}

/// Replay saved selections against the current catalog.
///
/// A selection whose product no longer exists, or whose product no longer
/// offers any plan, is dropped and its id reported. A selection whose saved
/// cadence is gone falls back to the product's default plan. When the same
/// product was saved more than once the last selection wins, at the position
/// of the first.
#[must_use]
pub fn reconcile(saved: &[SavedSelection], catalog: &Catalog) -> Reconciled {
    let mut reconciled = Reconciled::default();
    let mut index_of: FxHashMap<ProductKey, usize> = FxHashMap::default();

    for selection in saved {
        let Some(key) = catalog.key_for(&selection.product_id) else {
            reconciled.dropped.push(selection.product_id.clone());
            continue;
        };

        let Some(product) = catalog.product(key) else {
            reconciled.dropped.push(selection.product_id.clone());
            continue;
        };

        let Some(plan) = product
            .plans
            .plan_for(selection.plan)
            .or_else(|| product.plans.default_plan())
        else {
            reconciled.dropped.push(selection.product_id.clone());
            continue;
        };

        let line = CartLine::new(key, plan);

        match index_of.entry(key) {
            Entry::Occupied(slot) => {
                if let Some(existing) = reconciled.lines.get_mut(*slot.get()) {
                    *existing = line;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(reconciled.lines.len());
                reconciled.lines.push(line);
            }
        }
    }

    reconciled
}

/// Outcome of replaying saved favorites against the catalog.
#[derive(Debug, Clone, Default)]
pub struct ReconciledFavorites {
    /// Keys of favorites still in the catalog, first occurrence order.
    pub keys: Vec<ProductKey>,

    /// Product ids that no longer exist.
    pub dropped: SmallVec<[String; 4]>,
}

/// Replay saved favorite ids against the current catalog.
///
/// Vanished products are dropped and reported; repeats keep their first
/// occurrence.
#[must_use]
pub fn reconcile_favorites(ids: &[String], catalog: &Catalog) -> ReconciledFavorites {
    let mut reconciled = ReconciledFavorites::default();
    let mut seen: FxHashSet<ProductKey> = FxHashSet::default();

    for id in ids {
        let Some(key) = catalog.key_for(id) else {
            reconciled.dropped.push(id.clone());
            continue;
        };

        if seen.insert(key) {
            reconciled.keys.push(key);
        }
    }

    reconciled
}

#[cfg(test)]
mod tests {
    use rusty_money::Money;
    use testresult::TestResult;

    use crate::{STORE_CURRENCY, api::products::ProductRecord};

    use super::*;

    fn catalog() -> Result<Catalog, ApiError> {
        Catalog::from_records(vec![
            ProductRecord {
                id: "prod_1".into(),
                title: "Phonics Adventure".into(),
                one_time_price: Some(350.0),
                monthly_price: None,
                yearly_price: None,
            },
            ProductRecord {
                id: "prod_2".into(),
                title: "Math Safari".into(),
                one_time_price: None,
                monthly_price: Some(150.0),
                yearly_price: Some(1_200.0),
            },
            ProductRecord {
                id: "prod_3".into(),
                title: "Retired Reader".into(),
                one_time_price: None,
                monthly_price: None,
                yearly_price: None,
            },
        ])
    }

    #[test]
    fn saved_selection_round_trips_in_camel_case() -> TestResult {
        let selection = SavedSelection::new("prod_1", PlanKind::OneTime);

        let json = serde_json::to_string(&selection)?;
        assert_eq!(json, r#"{"productId":"prod_1","plan":"oneTime"}"#);

        let parsed: SavedSelection = serde_json::from_str(&json)?;
        assert_eq!(parsed, selection);

        Ok(())
    }

    #[test]
    fn vanished_product_is_dropped_and_reported() -> TestResult {
        let catalog = catalog()?;
        let saved = [
            SavedSelection::new("prod_1", PlanKind::OneTime),
            SavedSelection::new("prod_404", PlanKind::OneTime),
        ];

        let reconciled = reconcile(&saved, &catalog);

        assert_eq!(reconciled.lines.len(), 1);
        assert_eq!(reconciled.dropped.as_slice(), ["prod_404".to_string()]);

        Ok(())
    }

    #[test]
    fn missing_cadence_falls_back_to_the_default_plan() -> TestResult {
        let catalog = catalog()?;
        let saved = [SavedSelection::new("prod_2", PlanKind::OneTime)];

        let reconciled = reconcile(&saved, &catalog);

        let line = reconciled.lines.first().ok_or("expected one line")?;
        assert_eq!(line.plan_kind(), PlanKind::Monthly);
        assert_eq!(line.unit_price(), Money::from_minor(15_000, STORE_CURRENCY));
        assert!(reconciled.dropped.is_empty());

        Ok(())
    }

    #[test]
    fn product_without_any_plan_is_dropped() -> TestResult {
        let catalog = catalog()?;
        let saved = [SavedSelection::new("prod_3", PlanKind::Monthly)];

        let reconciled = reconcile(&saved, &catalog);

        assert!(reconciled.lines.is_empty());
        assert_eq!(reconciled.dropped.as_slice(), ["prod_3".to_string()]);

        Ok(())
    }

    #[test]
    fn repeated_product_keeps_the_last_plan_at_the_first_position() -> TestResult {
        let catalog = catalog()?;
        let saved = [
            SavedSelection::new("prod_2", PlanKind::Monthly),
            SavedSelection::new("prod_1", PlanKind::OneTime),
            SavedSelection::new("prod_2", PlanKind::Yearly),
        ];

        let reconciled = reconcile(&saved, &catalog);

        assert_eq!(reconciled.lines.len(), 2);

        let first = reconciled.lines.first().ok_or("expected a first line")?;
        assert_eq!(first.product(), catalog.key_for("prod_2").ok_or("no key")?);
        assert_eq!(first.plan_kind(), PlanKind::Yearly);
        assert_eq!(
            first.unit_price(),
            Money::from_minor(120_000, STORE_CURRENCY)
        );

        Ok(())
    }

    #[test]
    fn favorites_drop_vanished_ids_and_dedupe() -> TestResult {
        let catalog = catalog()?;
        let ids = [
            "prod_2".to_string(),
            "prod_404".to_string(),
            "prod_1".to_string(),
            "prod_2".to_string(),
        ];

        let reconciled = reconcile_favorites(&ids, &catalog);

        assert_eq!(
            reconciled.keys,
            vec![
                catalog.key_for("prod_2").ok_or("no key")?,
                catalog.key_for("prod_1").ok_or("no key")?,
            ]
        );
        assert_eq!(reconciled.dropped.as_slice(), ["prod_404".to_string()]);

        Ok(())
    }
}
