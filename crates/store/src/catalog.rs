//! Session catalog of fetched products.
//!
//! The storefront identifies products by opaque string ids while the pricing
//! core works in [`ProductKey`]s. A [`Catalog`] owns the products fetched for
//! the session and maps between the two in both directions.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use tuckshop::{
    plans::{PlanKind, PlanPrices},
    pricing::money_from_major_f64,
    products::{Product, ProductKey},
};

use crate::{
    STORE_CURRENCY,
    api::{ApiError, products::ProductRecord},
};

/// Products known to this session, keyed for pricing.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product<'static>>,
    key_by_id: FxHashMap<String, ProductKey>,
    id_by_key: FxHashMap<ProductKey, String>,
}

impl Catalog {
    /// Build a catalog from fetched product records.
    ///
    /// A repeated id replaces the earlier product under the same key, so the
    /// latest fetched state wins.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidAmount` when a price is not representable
    /// as money.
    pub fn from_records(records: Vec<ProductRecord>) -> Result<Self, ApiError> {
        let mut catalog = Self::default();

        for record in records {
            catalog.insert_record(record)?;
        }

        Ok(catalog)
    }

    fn insert_record(&mut self, record: ProductRecord) -> Result<(), ApiError> {
        let mut plans = PlanPrices::new();

        for (kind, price) in [
            (PlanKind::OneTime, record.one_time_price),
            (PlanKind::Monthly, record.monthly_price),
            (PlanKind::Yearly, record.yearly_price),
        ] {
            if let Some(price) = price {
                let price =
                    money_from_major_f64(price, STORE_CURRENCY).map_err(ApiError::InvalidAmount)?;
                plans.set(kind, price);
            }
        }

        let product = Product {
            title: record.title,
            plans,
        };

        if let Some(&key) = self.key_by_id.get(&record.id) {
            if let Some(slot) = self.products.get_mut(key) {
                *slot = product;
            }
            return Ok(());
        }

        let key = self.products.insert(product);
        self.key_by_id.insert(record.id.clone(), key);
        self.id_by_key.insert(key, record.id);

        Ok(())
    }

    /// The pricing key for a storefront id.
    #[must_use]
    pub fn key_for(&self, id: &str) -> Option<ProductKey> {
        self.key_by_id.get(id).copied()
    }

    /// The storefront id for a pricing key.
    #[must_use]
    pub fn id_for(&self, key: ProductKey) -> Option<&str> {
        self.id_by_key.get(&key).map(String::as_str)
    }

    /// The product stored under a key.
    #[must_use]
    pub fn product(&self, key: ProductKey) -> Option<&Product<'static>> {
        self.products.get(key)
    }

    /// Every product in the catalog, keyed.
    #[must_use]
    pub fn products(&self) -> &SlotMap<ProductKey, Product<'static>> {
        &self.products
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
