//! AI product route handlers.
//!
//! The products page demonstrates crop disease detection and yield
//! prediction. Both endpoints answer JSON, or re-render the page with the
//! result when the browser posted the form directly.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode, header::ACCEPT},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::cart::Notice;
use crate::services::{DiseaseReport, YieldInputs, YieldPrediction};
use crate::state::AppState;

/// Multipart field carrying the crop photo.
pub const IMAGE_FIELD: &str = "image";

/// Largest accepted upload.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Products page template.
#[derive(Template, WebTemplate, Default)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub disease: Option<DiseaseReport>,
    pub yield_prediction: Option<YieldPrediction>,
    pub notice: Option<Notice>,
}

impl ProductsTemplate {
    fn disease_confidence(&self) -> String {
        self.disease
            .as_ref()
            .map(|report| percent(report.confidence))
            .unwrap_or_default()
    }

    fn yield_confidence(&self) -> String {
        self.yield_prediction
            .as_ref()
            .map(|prediction| percent(prediction.confidence))
            .unwrap_or_default()
    }
}

/// Confidence as a percentage with one decimal, e.g. `92.0%`.
#[must_use]
pub fn percent(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

/// Whether the client asked for an HTML page rather than JSON.
fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Display the products page.
#[instrument]
pub async fn index() -> impl IntoResponse {
    ProductsTemplate::default()
}

/// Run disease detection on an uploaded crop photo.
///
/// # Errors
///
/// Returns 400 if no image was uploaded or the body is malformed.
#[instrument(skip(state, headers, multipart))]
pub async fn disease_detection(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            if !bytes.is_empty() {
                image = Some(bytes);
            }
        }
    }

    let Some(image) = image else {
        if wants_html(&headers) {
            let page = ProductsTemplate {
                notice: Some(Notice::error(
                    "No image selected",
                    "Please upload an image first",
                )),
                ..ProductsTemplate::default()
            };
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
        return Err(AppError::BadRequest("No image selected".to_string()));
    };

    let report = state.insights().detect_disease(&image).await;

    if wants_html(&headers) {
        Ok(ProductsTemplate {
            disease: Some(report),
            ..ProductsTemplate::default()
        }
        .into_response())
    } else {
        Ok(Json(report).into_response())
    }
}

/// Predict yield from farm conditions.
///
/// # Errors
///
/// Returns 400 for a negative land size. Malformed forms are rejected by
/// the `Form` extractor.
#[instrument(skip(state, headers, inputs))]
pub async fn yield_prediction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(inputs): Form<YieldInputs>,
) -> Result<Response> {
    if inputs.land_size < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Land size must not be negative".to_string(),
        ));
    }

    let prediction = state.insights().predict_yield(&inputs).await;

    if wants_html(&headers) {
        Ok(ProductsTemplate {
            yield_prediction: Some(prediction),
            ..ProductsTemplate::default()
        }
        .into_response())
    } else {
        Ok(Json(prediction).into_response())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.92), "92.0%");
        assert_eq!(percent(0.89), "89.0%");
    }

    #[test]
    fn test_wants_html() {
        let mut headers = HeaderMap::new();
        assert!(!wants_html(&headers));

        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        assert!(wants_html(&headers));
    }

    #[test]
    fn test_page_renders_both_forms() {
        let html = ProductsTemplate::default().render().unwrap();
        assert!(html.contains("Crop Disease Detection"));
        assert!(html.contains("name=\"landSize\""));
    }
}
