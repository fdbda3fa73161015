//! Order submission.
//!
//! The session lock is held only to start and to resolve a submission, never
//! across the order call. The call and its resolution run on a spawned task
//! so a shopper who disconnects mid-order still ends up out of `Submitting`.

use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;

use agritech_core::{OrderError, OrderService, SubmissionOutcome};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::shoppers::SharedSession;

/// Submit the shopper's draft as an order and wait for the outcome.
///
/// # Errors
///
/// Returns `AppError::Checkout` when the flow refuses to submit (invalid
/// address, empty cart, submission already in flight). Order failures are
/// reported through [`SubmissionOutcome::Failed`].
#[instrument(skip_all, fields(timeout_ms = %timeout.as_millis()))]
pub async fn submit_order(
    session: &SharedSession,
    orders: Arc<dyn OrderService>,
    timeout: Duration,
) -> Result<SubmissionOutcome> {
    let ticket = session.lock().await.submit()?;
    let attempt = ticket.attempt();
    add_breadcrumb(
        "checkout",
        "Order submitted",
        Some(&[("attempt", &attempt.to_string())]),
    );

    let session = Arc::clone(session);
    let task = tokio::spawn(async move {
        let call = tokio::spawn(async move {
            match tokio::time::timeout(
                timeout,
                orders.place_order(ticket.address(), ticket.lines()),
            )
            .await
            {
                Ok(reply) => reply,
                Err(_) => Err(OrderError::TimedOut(timeout)),
            }
        });
        let reply = call
            .await
            .unwrap_or_else(|e| Err(OrderError::Unavailable(e.to_string())));

        session.lock().await.resolve(attempt, reply)
    });

    let outcome = task
        .await
        .map_err(|e| AppError::Internal(format!("order task failed: {e}")))?;

    match &outcome {
        SubmissionOutcome::Confirmed(confirmation) => {
            tracing::info!(
                attempt,
                order_id = %confirmation.order_id,
                "Order placed"
            );
        }
        SubmissionOutcome::Failed(err) => {
            tracing::warn!(attempt, error = %err, "Order failed");
        }
        SubmissionOutcome::Stale => {
            tracing::warn!(attempt, "Discarded stale order reply");
        }
    }

    Ok(outcome)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use agritech_core::{
        AddressField, CartCommand, CartLine, CheckoutError, CheckoutStage, DeliveryAddress,
        OrderReceipt, Price, Product, ProductCategory, ProductId, ShoppingSession,
    };

    use super::*;
    use crate::services::orders::MockOrderService;

    struct StalledOrderService;

    #[async_trait]
    impl OrderService for StalledOrderService {
        async fn place_order(
            &self,
            _address: &DeliveryAddress,
            _lines: &[CartLine],
        ) -> std::result::Result<OrderReceipt, OrderError> {
            std::future::pending().await
        }
    }

    fn ready_session() -> SharedSession {
        let mut session = ShoppingSession::new();
        session
            .apply(CartCommand::Add(Product {
                id: ProductId::new("3"),
                name: "Natural Fertilizer".to_string(),
                description: String::new(),
                price: Price::from_cents(2999),
                image: String::new(),
                category: ProductCategory::Fertilizers,
                stock: 75,
            }))
            .unwrap();
        session.begin_checkout();
        for field in AddressField::ALL {
            session.update_address(field, "filled").unwrap();
        }
        Arc::new(Mutex::new(session))
    }

    #[tokio::test]
    async fn test_confirmed_order_clears_cart() {
        let session = ready_session();
        let orders: Arc<dyn OrderService> = Arc::new(MockOrderService::new(Duration::ZERO));

        let outcome = submit_order(&session, orders, Duration::from_secs(1))
            .await
            .unwrap();

        assert!(matches!(outcome, SubmissionOutcome::Confirmed(_)));
        let session = session.lock().await;
        assert!(session.cart().is_empty());
        assert_eq!(session.stage(), CheckoutStage::Reviewing);
    }

    #[tokio::test]
    async fn test_timeout_returns_to_address_entry() {
        let session = ready_session();
        let orders: Arc<dyn OrderService> = Arc::new(StalledOrderService);

        let outcome = submit_order(&session, orders, Duration::from_millis(20))
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            SubmissionOutcome::Failed(OrderError::TimedOut(_))
        ));
        let session = session.lock().await;
        assert_eq!(session.stage(), CheckoutStage::EnteringAddress);
        assert_eq!(session.cart().line_count(), 1);
        assert_eq!(session.checkout().draft().city, "filled");
    }

    #[tokio::test]
    async fn test_submit_outside_address_entry_is_rejected() {
        let session: SharedSession = Arc::new(Mutex::new(ShoppingSession::new()));
        let orders: Arc<dyn OrderService> = Arc::new(StalledOrderService);

        let result = submit_order(&session, orders, Duration::from_millis(20)).await;

        assert!(matches!(
            result,
            Err(AppError::Checkout(CheckoutError::NotEnteringAddress(_)))
        ));
    }
}
