//! Store Context

use std::sync::Arc;

use crate::{
    api::{
        StorefrontApi, StorefrontConfig, discounts::DiscountLookup, orders::OrdersService,
        products::ProductsService,
    },
    checkout::Checkout,
    config::StoreConfig,
    local::LocalStore,
    selections::SelectionStore,
};

#[derive(Clone)]
pub struct StoreContext {
    pub products: Arc<dyn ProductsService>,
    pub discounts: Arc<dyn DiscountLookup>,
    pub orders: Arc<dyn OrdersService>,
    pub selections: Arc<dyn SelectionStore>,
    pub local: Arc<LocalStore>,
}

impl StoreContext {
    /// Wire up services from configuration.
    ///
    /// With a session the cart lives on the storefront; without one it lives
    /// in the local state file. Favorites always live locally.
    #[must_use]
    pub fn from_config(config: &StoreConfig) -> Self {
        let api = Arc::new(StorefrontApi::new(StorefrontConfig {
            base_url: config.api_url.clone(),
            session: config.session.clone(),
        }));
        let local = Arc::new(LocalStore::new(config.state_file.clone()));

        let selections: Arc<dyn SelectionStore> = if config.session.is_some() {
            api.clone()
        } else {
            local.clone()
        };

        Self {
            products: api.clone(),
            discounts: api.clone(),
            orders: api,
            selections,
            local,
        }
    }

    /// Checkout flow over this context's services.
    #[must_use]
    pub fn checkout(&self) -> Checkout {
        Checkout::new(self.discounts.clone(), self.orders.clone())
    }
}
