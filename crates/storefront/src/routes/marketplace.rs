//! Marketplace route handlers.
//!
//! Product grid with category filter, plus the shopper's cart panel.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use agritech_core::{Product, ProductCategory};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CurrentShopper;
use crate::routes::cart::PanelView;
use crate::state::AppState;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub category: &'static str,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            image: product.image.clone(),
            category: product.category.label(),
        }
    }
}

/// Category filter tab.
#[derive(Clone)]
pub struct CategoryView {
    pub key: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Marketplace page template.
#[derive(Template, WebTemplate)]
#[template(path = "marketplace.html")]
pub struct MarketplaceTemplate {
    pub products: Vec<ProductView>,
    pub categories: Vec<CategoryView>,
    pub show_all: bool,
    pub panel: PanelView,
}

impl MarketplaceTemplate {
    /// Build the page, optionally filtered to one category.
    #[must_use]
    pub fn new(state: &AppState, category: Option<ProductCategory>, panel: PanelView) -> Self {
        let catalog = state.catalog();
        let products = match category {
            Some(category) => catalog.in_category(category).map(ProductView::from).collect(),
            None => catalog.products().iter().map(ProductView::from).collect(),
        };

        Self {
            products,
            categories: ProductCategory::ALL
                .iter()
                .map(|&c| CategoryView {
                    key: c.key(),
                    label: c.label(),
                    active: category == Some(c),
                })
                .collect(),
            show_all: category.is_none(),
            panel,
        }
    }
}

/// Marketplace query parameters.
#[derive(Debug, Deserialize)]
pub struct MarketplaceQuery {
    pub category: Option<String>,
}

/// Parse an optional category filter. Empty means all.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for unknown categories.
pub fn parse_category(raw: Option<&str>) -> Result<Option<ProductCategory>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(key) => key.parse().map(Some).map_err(AppError::BadRequest),
    }
}

/// Display the marketplace.
///
/// # Errors
///
/// Returns 400 for an unknown category.
#[instrument(skip(state, shopper), fields(shopper = %shopper.id))]
pub async fn index(
    State(state): State<AppState>,
    shopper: CurrentShopper,
    Query(query): Query<MarketplaceQuery>,
) -> Result<impl IntoResponse> {
    let category = parse_category(query.category.as_deref())?;
    let panel = PanelView::new(&*shopper.session.lock().await);
    Ok(MarketplaceTemplate::new(&state, category, panel))
}
