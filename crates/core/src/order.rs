//! Order placement seam.
//!
//! The checkout flow hands a validated address and the cart lines to an
//! [`OrderService`] and waits for its reply. Implementations live outside
//! the core crate.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::address::DeliveryAddress;
use crate::cart::CartLine;
use crate::types::OrderId;

/// Raw reply from an order service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub success: bool,
    pub order_id: OrderId,
    pub message: String,
}

/// Confirmation shown to the shopper after a successful order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub message: String,
}

/// Reasons an order was not placed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The service answered but declined the order.
    #[error("order rejected: {0}")]
    Rejected(String),

    /// No answer within the allotted time.
    #[error("order service timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),

    /// The service could not be reached or crashed.
    #[error("order service unavailable: {0}")]
    Unavailable(String),
}

impl OrderReceipt {
    /// Interpret the reply, treating `success: false` as a rejection.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Rejected`] carrying the service's message.
    pub fn into_confirmation(self) -> Result<OrderConfirmation, OrderError> {
        if self.success {
            Ok(OrderConfirmation {
                order_id: self.order_id,
                message: self.message,
            })
        } else {
            Err(OrderError::Rejected(self.message))
        }
    }
}

/// External collaborator that accepts orders.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Place a cash-on-delivery order.
    async fn place_order(
        &self,
        address: &DeliveryAddress,
        lines: &[CartLine],
    ) -> Result<OrderReceipt, OrderError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_receipt_confirms() {
        let receipt = OrderReceipt {
            success: true,
            order_id: OrderId::new("k3x9q2ab"),
            message: "Order placed successfully!".to_owned(),
        };
        let confirmation = receipt.into_confirmation().unwrap();
        assert_eq!(confirmation.order_id.as_str(), "k3x9q2ab");
    }

    #[test]
    fn test_unsuccessful_receipt_is_rejection() {
        let receipt = OrderReceipt {
            success: false,
            order_id: OrderId::new(""),
            message: "Out of delivery range".to_owned(),
        };
        assert_eq!(
            receipt.into_confirmation(),
            Err(OrderError::Rejected("Out of delivery range".to_owned()))
        );
    }

    #[test]
    fn test_receipt_wire_shape() {
        let receipt = OrderReceipt {
            success: true,
            order_id: OrderId::new("abc"),
            message: "ok".to_owned(),
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["orderId"], "abc");
        assert_eq!(json["success"], true);
    }

    #[test]
    fn test_timeout_display() {
        let err = OrderError::TimedOut(Duration::from_millis(2500));
        assert_eq!(err.to_string(), "order service timed out after 2500ms");
    }
}
