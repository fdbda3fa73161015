//! JSON API route handlers.
//!
//! Read-only views of the catalog and the current shopper's cart.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;
use tracing::instrument;

use agritech_core::{CartState, CheckoutStage, DeliveryAddress, Product};

use crate::error::Result;
use crate::middleware::CurrentShopper;
use crate::routes::marketplace::{MarketplaceQuery, parse_category};
use crate::state::AppState;

/// Cart snapshot returned by `GET /api/cart`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cart: CartState,
    pub item_count: u64,
    pub stage: CheckoutStage,
    pub delivery_address: DeliveryAddress,
}

/// List catalog products, optionally filtered by `category`.
///
/// # Errors
///
/// Returns 400 for an unknown category.
#[instrument(skip(state))]
pub async fn catalog(
    State(state): State<AppState>,
    Query(query): Query<MarketplaceQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = match parse_category(query.category.as_deref())? {
        Some(category) => state.catalog().in_category(category).cloned().collect(),
        None => state.catalog().products().to_vec(),
    };
    Ok(Json(products))
}

/// The current shopper's cart and checkout stage.
#[instrument(skip(shopper), fields(shopper = %shopper.id))]
pub async fn cart(shopper: CurrentShopper) -> Json<CartResponse> {
    let session = shopper.session.lock().await;
    Json(CartResponse {
        cart: session.cart().clone(),
        item_count: session.cart().total_quantity(),
        stage: session.stage(),
        delivery_address: session.checkout().draft().clone(),
    })
}
