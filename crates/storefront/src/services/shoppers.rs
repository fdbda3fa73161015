//! In-memory shopping sessions keyed by shopper.
//!
//! Each visitor's cart and checkout live here for as long as they keep
//! browsing. Entries expire after the configured idle time, matching the
//! session cookie expiry.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::Mutex;

use agritech_core::{ShopperId, ShoppingSession};

/// Upper bound on concurrently tracked shoppers.
const MAX_SHOPPERS: u64 = 100_000;

/// One shopper's state. Locked for the duration of each state transition.
pub type SharedSession = Arc<Mutex<ShoppingSession>>;

/// Registry of live shopping sessions.
#[derive(Clone)]
pub struct ShopperStore {
    sessions: Cache<ShopperId, SharedSession>,
}

impl ShopperStore {
    /// Create a store whose entries expire after `idle` without access.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(MAX_SHOPPERS)
            .time_to_idle(idle)
            .build();
        Self { sessions }
    }

    /// Get the shopper's session, starting an empty one if none exists.
    pub async fn get_or_create(&self, shopper: ShopperId) -> SharedSession {
        self.sessions
            .get_with(shopper, async { Arc::new(Mutex::new(ShoppingSession::new())) })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use agritech_core::{CartCommand, Price, Product, ProductCategory, ProductId};

    use super::*;

    fn seeds() -> Product {
        Product {
            id: ProductId::new("2"),
            name: "Organic Tomato Seeds".to_string(),
            description: String::new(),
            price: Price::from_cents(499),
            image: String::new(),
            category: ProductCategory::Seeds,
            stock: 100,
        }
    }

    #[tokio::test]
    async fn test_sessions_are_per_shopper() {
        let store = ShopperStore::new(Duration::from_secs(60));
        let alice = ShopperId::generate();
        let bob = ShopperId::generate();

        store
            .get_or_create(alice)
            .await
            .lock()
            .await
            .apply(CartCommand::Add(seeds()))
            .unwrap();

        let alice_session = store.get_or_create(alice).await;
        assert_eq!(alice_session.lock().await.cart().line_count(), 1);

        let bob_session = store.get_or_create(bob).await;
        assert!(bob_session.lock().await.cart().is_empty());
    }
}
