//! Cart route handlers.
//!
//! Every cart and checkout action answers with the cart panel. HTMX requests
//! get just the panel fragment; plain form posts get the whole marketplace
//! page so the site works without JavaScript.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use agritech_core::{
    AddressField, CartCommand, CartState, CheckoutError, CheckoutFlow, CheckoutStage,
    MAX_QUANTITY, OrderConfirmation, Product, ProductId, ShoppingSession,
};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CurrentShopper;
use crate::routes::marketplace::MarketplaceTemplate;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    /// Quantity posted by the decrease button. Zero removes the line.
    pub dec_quantity: u32,
    /// Quantity posted by the increase button, capped at `MAX_QUANTITY`.
    pub inc_quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    /// Distinct products, shown in the cart badge.
    pub item_count: usize,
}

impl From<&CartState> for CartView {
    fn from(cart: &CartState) -> Self {
        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CartItemView {
                    product_id: line.product_id().to_string(),
                    name: line.product().name.clone(),
                    image: line.product().image.clone(),
                    quantity: line.quantity(),
                    dec_quantity: line.quantity().saturating_sub(1),
                    inc_quantity: line.quantity().saturating_add(1).min(MAX_QUANTITY),
                    price: line.product().price.display(),
                    line_price: line.line_total().display(),
                })
                .collect(),
            subtotal: cart.total().display(),
            item_count: cart.line_count(),
        }
    }
}

/// One delivery address input.
#[derive(Clone)]
pub struct AddressFieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// Checkout display data for templates.
#[derive(Clone)]
pub struct CheckoutView {
    pub stage: CheckoutStage,
    pub is_reviewing: bool,
    pub is_entering_address: bool,
    pub is_submitting: bool,
    pub fields: Vec<AddressFieldView>,
}

impl From<&CheckoutFlow> for CheckoutView {
    fn from(flow: &CheckoutFlow) -> Self {
        let stage = flow.stage();
        Self {
            stage,
            is_reviewing: stage == CheckoutStage::Reviewing,
            is_entering_address: stage == CheckoutStage::EnteringAddress,
            is_submitting: stage == CheckoutStage::Submitting,
            fields: AddressField::ALL
                .iter()
                .map(|&field| AddressFieldView {
                    key: field.key(),
                    label: field.label(),
                    value: flow.draft().get(field).to_string(),
                })
                .collect(),
        }
    }
}

/// Transient message shown above the cart.
#[derive(Clone)]
pub struct Notice {
    pub is_error: bool,
    pub title: &'static str,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            is_error: false,
            title,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            title,
            message: message.into(),
        }
    }
}

/// Everything the cart panel renders.
#[derive(Clone)]
pub struct PanelView {
    pub cart: CartView,
    pub checkout: CheckoutView,
    pub notice: Option<Notice>,
    pub confirmation: Option<OrderConfirmation>,
}

impl PanelView {
    #[must_use]
    pub fn new(session: &ShoppingSession) -> Self {
        Self {
            cart: CartView::from(session.cart()),
            checkout: CheckoutView::from(session.checkout()),
            notice: None,
            confirmation: None,
        }
    }

    #[must_use]
    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub panel: PanelView,
}

/// A rendered answer to a cart or checkout action.
pub struct PanelReply {
    status: StatusCode,
    panel: PanelView,
    changed: bool,
}

impl PanelReply {
    #[must_use]
    pub fn new(panel: PanelView, changed: bool) -> Self {
        Self {
            status: StatusCode::OK,
            panel,
            changed,
        }
    }

    /// Panel carrying the error's notice and status. Nothing changed.
    #[must_use]
    pub fn error(err: &AppError, panel: PanelView) -> Self {
        err.report();
        let title = match err {
            AppError::Checkout(CheckoutError::InvalidAddress(_)) => "Missing Information",
            AppError::Checkout(_) => "Checkout",
            _ => "Order Failed",
        };
        Self {
            status: err.status(),
            panel: panel.with_notice(Notice::error(title, err.public_message())),
            changed: false,
        }
    }

    /// Override the status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Render the fragment or the full page depending on the request.
    pub fn render(self, state: &AppState, headers: &HeaderMap) -> Response {
        let trigger = AppendHeaders(self.changed.then_some(("HX-Trigger", "cart-updated")));
        if is_htmx(headers) {
            (
                self.status,
                trigger,
                CartPanelTemplate { panel: self.panel },
            )
                .into_response()
        } else {
            (
                self.status,
                trigger,
                MarketplaceTemplate::new(state, None, self.panel),
            )
                .into_response()
        }
    }
}

/// Whether the request came from HTMX.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

/// Look up a catalog product.
///
/// # Errors
///
/// Returns `AppError::NotFound` for unknown ids.
pub fn find_product(state: &AppState, id: &str) -> Result<Product> {
    state
        .catalog()
        .get(&ProductId::new(id))
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Product selection form data.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: String,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub product_id: String,
    pub quantity: u32,
}

/// Apply a cart command to the shopper's session and render the panel.
async fn apply_command(
    state: &AppState,
    shopper: &CurrentShopper,
    headers: &HeaderMap,
    command: CartCommand,
) -> Response {
    let reply = {
        let mut session = shopper.session.lock().await;
        match session.apply(command) {
            Ok(changed) => PanelReply::new(PanelView::new(&session), changed),
            Err(err) => PanelReply::error(&AppError::from(err), PanelView::new(&session)),
        }
    };
    reply.render(state, headers)
}

/// Display the cart panel.
#[instrument(skip(state, shopper, headers), fields(shopper = %shopper.id))]
pub async fn show(
    State(state): State<AppState>,
    shopper: CurrentShopper,
    headers: HeaderMap,
) -> Response {
    let panel = PanelView::new(&*shopper.session.lock().await);
    PanelReply::new(panel, false).render(&state, &headers)
}

/// Add one unit of a product to the cart.
#[instrument(skip(state, shopper, headers), fields(shopper = %shopper.id))]
pub async fn add(
    State(state): State<AppState>,
    shopper: CurrentShopper,
    headers: HeaderMap,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let product = find_product(&state, &form.product_id)?;
    add_breadcrumb(
        "cart",
        "Added product",
        Some(&[("product_id", product.id.as_str())]),
    );
    Ok(apply_command(&state, &shopper, &headers, CartCommand::Add(product)).await)
}

/// Set a line's quantity. Zero removes the line.
#[instrument(skip(state, shopper, headers), fields(shopper = %shopper.id))]
pub async fn update(
    State(state): State<AppState>,
    shopper: CurrentShopper,
    headers: HeaderMap,
    Form(form): Form<QuantityForm>,
) -> Result<Response> {
    let product = find_product(&state, &form.product_id)?;
    let command = CartCommand::SetQuantity {
        product_id: product.id,
        quantity: form.quantity,
    };
    Ok(apply_command(&state, &shopper, &headers, command).await)
}

/// Remove a product's line.
#[instrument(skip(state, shopper, headers), fields(shopper = %shopper.id))]
pub async fn remove(
    State(state): State<AppState>,
    shopper: CurrentShopper,
    headers: HeaderMap,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let product = find_product(&state, &form.product_id)?;
    Ok(apply_command(&state, &shopper, &headers, CartCommand::Remove(product.id)).await)
}

/// Empty the cart.
#[instrument(skip(state, shopper, headers), fields(shopper = %shopper.id))]
pub async fn clear(
    State(state): State<AppState>,
    shopper: CurrentShopper,
    headers: HeaderMap,
) -> Response {
    apply_command(&state, &shopper, &headers, CartCommand::Clear).await
}
