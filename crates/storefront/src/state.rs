//! Application state shared across handlers.

use std::sync::Arc;

use agritech_core::{Catalog, OrderService};

use crate::config::StorefrontConfig;
use crate::services::{InsightService, MockOrderService, ShopperStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, the order service, and every shopper's session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    orders: Arc<dyn OrderService>,
    insights: InsightService,
    shoppers: ShopperStore,
}

impl AppState {
    /// Create a new application state with the given order service.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Products offered in the marketplace
    /// * `orders` - Backend that accepts orders
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Catalog,
        orders: Arc<dyn OrderService>,
    ) -> Self {
        let insights = InsightService::new(config.mock_latency);
        let shoppers = ShopperStore::new(config.session_idle);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                orders,
                insights,
                shoppers,
            }),
        }
    }

    /// Create application state backed by the mocked order service.
    #[must_use]
    pub fn with_mock_orders(config: StorefrontConfig, catalog: Catalog) -> Self {
        let orders = Arc::new(MockOrderService::new(config.mock_latency));
        Self::new(config, catalog, orders)
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a handle to the order service.
    #[must_use]
    pub fn orders(&self) -> Arc<dyn OrderService> {
        Arc::clone(&self.inner.orders)
    }

    /// Get a reference to the insight service.
    #[must_use]
    pub fn insights(&self) -> &InsightService {
        &self.inner.insights
    }

    /// Get a reference to the shopper session registry.
    #[must_use]
    pub fn shoppers(&self) -> &ShopperStore {
        &self.inner.shoppers
    }
}
