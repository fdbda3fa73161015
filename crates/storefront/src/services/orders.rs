//! Mocked order placement.
//!
//! Stands in for a real fulfilment backend: waits for the configured latency,
//! then accepts every order with a random short order id. A rejecting mode
//! exercises the failure path in tests and demos.

use std::time::Duration;

use async_trait::async_trait;
use rand::{Rng, distr::Alphanumeric};
use tracing::instrument;

use agritech_core::{CartLine, DeliveryAddress, OrderError, OrderId, OrderReceipt, OrderService};

/// Length of generated order ids.
pub const ORDER_ID_LEN: usize = 8;

/// Confirmation message returned for accepted orders.
pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully!";

#[derive(Debug, Clone)]
enum Behavior {
    Accept,
    Reject(String),
}

/// In-process order service with simulated latency.
#[derive(Debug, Clone)]
pub struct MockOrderService {
    latency: Duration,
    behavior: Behavior,
}

impl MockOrderService {
    /// Service that accepts every order.
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self {
            latency,
            behavior: Behavior::Accept,
        }
    }

    /// Service that replies `success: false` with `message` to every order.
    #[must_use]
    pub fn rejecting(latency: Duration, message: impl Into<String>) -> Self {
        Self {
            latency,
            behavior: Behavior::Reject(message.into()),
        }
    }
}

#[async_trait]
impl OrderService for MockOrderService {
    #[instrument(skip(self, address, lines), fields(lines = lines.len()))]
    async fn place_order(
        &self,
        address: &DeliveryAddress,
        lines: &[CartLine],
    ) -> Result<OrderReceipt, OrderError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let order_id = generate_order_id();
        match &self.behavior {
            Behavior::Accept => {
                tracing::info!(
                    order_id = %order_id,
                    city = %address.city,
                    "Mock order accepted"
                );
                Ok(OrderReceipt {
                    success: true,
                    order_id,
                    message: ORDER_PLACED_MESSAGE.to_string(),
                })
            }
            Behavior::Reject(message) => {
                tracing::info!(order_id = %order_id, "Mock order rejected");
                Ok(OrderReceipt {
                    success: false,
                    order_id,
                    message: message.clone(),
                })
            }
        }
    }
}

/// Random lowercase alphanumeric order id.
fn generate_order_id() -> OrderId {
    let id: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(ORDER_ID_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    OrderId::new(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_shape() {
        let id = generate_order_id();
        assert_eq!(id.as_str().len(), ORDER_ID_LEN);
        assert!(
            id.as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[tokio::test]
    async fn test_accepting_service() {
        let service = MockOrderService::new(Duration::ZERO);
        let receipt = service
            .place_order(&DeliveryAddress::default(), &[])
            .await
            .unwrap();

        assert!(receipt.success);
        assert_eq!(receipt.message, ORDER_PLACED_MESSAGE);
    }

    #[tokio::test]
    async fn test_rejecting_service() {
        let service = MockOrderService::rejecting(Duration::ZERO, "Out of delivery range");
        let receipt = service
            .place_order(&DeliveryAddress::default(), &[])
            .await
            .unwrap();

        assert!(!receipt.success);
        assert_eq!(
            receipt.into_confirmation(),
            Err(OrderError::Rejected("Out of delivery range".to_string()))
        );
    }
}
