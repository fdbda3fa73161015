//! Checkout route handlers.
//!
//! Checkout is cash on delivery: the shopper reviews the cart, enters a
//! delivery address, and submits. The address draft persists in the
//! shopper's session between requests.

use std::collections::HashMap;

use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::instrument;

use agritech_core::{AddressField, ShoppingSession, SubmissionOutcome};

use crate::error::{AppError, Result};
use crate::middleware::CurrentShopper;
use crate::routes::cart::{Notice, PanelReply, PanelView};
use crate::services::submit_order;
use crate::state::AppState;

/// Submitted address fields keyed by `AddressField::key`.
///
/// Any subset may be present; unknown keys are ignored.
pub type AddressForm = HashMap<String, String>;

/// Copy the posted fields into the draft.
fn apply_address(session: &mut ShoppingSession, form: &AddressForm) -> Result<()> {
    for field in AddressField::ALL {
        if let Some(value) = form.get(field.key()) {
            session.update_address(field, value.as_str())?;
        }
    }
    Ok(())
}

/// Move from the cart to address entry.
///
/// An empty cart leaves the flow in reviewing.
#[instrument(skip(state, shopper, headers), fields(shopper = %shopper.id))]
pub async fn begin(
    State(state): State<AppState>,
    shopper: CurrentShopper,
    headers: HeaderMap,
) -> Response {
    let reply = {
        let mut session = shopper.session.lock().await;
        let changed = session.begin_checkout();
        PanelReply::new(PanelView::new(&session), changed)
    };
    reply.render(&state, &headers)
}

/// Update delivery address fields.
#[instrument(skip(state, shopper, headers, form), fields(shopper = %shopper.id))]
pub async fn address(
    State(state): State<AppState>,
    shopper: CurrentShopper,
    headers: HeaderMap,
    Form(form): Form<AddressForm>,
) -> Response {
    let reply = {
        let mut session = shopper.session.lock().await;
        match apply_address(&mut session, &form) {
            Ok(()) => PanelReply::new(PanelView::new(&session), false),
            Err(err) => PanelReply::error(&err, PanelView::new(&session)),
        }
    };
    reply.render(&state, &headers)
}

/// Return from address entry to the cart. The draft is kept.
#[instrument(skip(state, shopper, headers), fields(shopper = %shopper.id))]
pub async fn back(
    State(state): State<AppState>,
    shopper: CurrentShopper,
    headers: HeaderMap,
) -> Response {
    let reply = {
        let mut session = shopper.session.lock().await;
        match session.back() {
            Ok(changed) => PanelReply::new(PanelView::new(&session), changed),
            Err(err) => PanelReply::error(&AppError::from(err), PanelView::new(&session)),
        }
    };
    reply.render(&state, &headers)
}

/// Place the order.
///
/// Fields posted with the request are applied to the draft first, so the
/// address form can submit directly.
///
/// # Errors
///
/// Only fails if the background order task itself fails; checkout and
/// order errors are rendered into the panel.
#[instrument(skip(state, shopper, headers, form), fields(shopper = %shopper.id))]
pub async fn submit(
    State(state): State<AppState>,
    shopper: CurrentShopper,
    headers: HeaderMap,
    Form(form): Form<AddressForm>,
) -> Result<Response> {
    {
        let mut session = shopper.session.lock().await;
        if let Err(err) = apply_address(&mut session, &form) {
            let panel = PanelView::new(&session);
            drop(session);
            return Ok(PanelReply::error(&err, panel).render(&state, &headers));
        }
    }

    let outcome = submit_order(
        &shopper.session,
        state.orders(),
        state.config().order_timeout,
    )
    .await;

    let panel = PanelView::new(&*shopper.session.lock().await);
    let reply = match outcome {
        Ok(SubmissionOutcome::Confirmed(confirmation)) => {
            let notice = Notice::success(
                "Order Placed Successfully!",
                format!("Order ID: {}", confirmation.order_id),
            );
            let mut panel = panel.with_notice(notice);
            panel.confirmation = Some(confirmation);
            PanelReply::new(panel, true)
        }
        Ok(SubmissionOutcome::Failed(err)) => PanelReply::error(&AppError::Order(err), panel),
        Ok(SubmissionOutcome::Stale) => PanelReply::new(
            panel.with_notice(Notice::error(
                "Checkout",
                "This order was superseded by a newer submission",
            )),
            false,
        )
        .with_status(StatusCode::CONFLICT),
        Err(err @ AppError::Checkout(_)) => PanelReply::error(&err, panel),
        Err(err) => return Err(err),
    };
    Ok(reply.render(&state, &headers))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use agritech_core::{
        CartCommand, CheckoutError, CheckoutStage, Price, Product, ProductCategory, ProductId,
    };

    use super::*;

    #[test]
    fn test_apply_address_accepts_subset() {
        let mut session = ShoppingSession::new();
        session
            .apply(CartCommand::Add(Product {
                id: ProductId::new("4"),
                name: "Neem Oil Pesticide".to_string(),
                description: String::new(),
                price: Price::from_cents(1999),
                image: String::new(),
                category: ProductCategory::Pesticides,
                stock: 60,
            }))
            .unwrap();
        session.begin_checkout();

        let form: AddressForm = [
            ("full_name".to_string(), "Jane Farmer".to_string()),
            ("ignored".to_string(), "x".to_string()),
        ]
        .into_iter()
        .collect();
        apply_address(&mut session, &form).unwrap();

        assert_eq!(session.checkout().draft().full_name, "Jane Farmer");
        assert_eq!(session.checkout().draft().city, "");
    }

    #[test]
    fn test_apply_address_outside_address_entry() {
        let mut session = ShoppingSession::new();
        let form: AddressForm = [("city".to_string(), "Agritown".to_string())]
            .into_iter()
            .collect();

        let err = apply_address(&mut session, &form).unwrap_err();
        assert!(matches!(
            err,
            AppError::Checkout(CheckoutError::NotEnteringAddress(CheckoutStage::Reviewing))
        ));
    }
}
