//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                             - Landing page
//! GET  /about                        - About page
//! GET  /health                       - Health check
//!
//! # AI products
//! GET  /products                     - Products page
//! POST /products/disease-detection   - Analyse a crop photo (multipart `image`)
//! POST /products/yield-prediction    - Predict yield (form)
//!
//! # Marketplace
//! GET  /marketplace                  - Product grid and cart panel (?category=)
//!
//! # Cart (HTMX fragments, full page without HX-Request)
//! GET  /cart                         - Cart panel
//! POST /cart/add                     - Add one unit (product_id)
//! POST /cart/update                  - Set quantity (product_id, quantity)
//! POST /cart/remove                  - Remove line (product_id)
//! POST /cart/clear                   - Empty cart
//!
//! # Checkout (cash on delivery)
//! POST /checkout/begin               - Start address entry
//! POST /checkout/address             - Update address fields
//! POST /checkout/back                - Back to the cart
//! POST /checkout/submit              - Place the order
//!
//! # JSON API
//! GET  /api/catalog                  - Catalog products (?category=)
//! GET  /api/cart                     - Current cart and checkout stage
//! ```

pub mod api;
pub mod cart;
pub mod checkout;
pub mod marketplace;
pub mod pages;
pub mod products;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the AI product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route(
            "/disease-detection",
            post(products::disease_detection)
                .layer(DefaultBodyLimit::max(products::MAX_IMAGE_BYTES)),
        )
        .route("/yield-prediction", post(products::yield_prediction))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/begin", post(checkout::begin))
        .route("/address", post(checkout::address))
        .route("/back", post(checkout::back))
        .route("/submit", post(checkout::submit))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(api::catalog))
        .route("/cart", get(api::cart))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/marketplace", get(marketplace::index))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/api", api_routes())
}
