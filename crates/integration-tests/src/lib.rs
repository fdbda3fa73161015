//! Integration test harness for the AgriTech storefront.
//!
//! Drives the full router in-process with `tower::ServiceExt::oneshot`, so
//! no server or network is needed. A [`TestClient`] remembers the session
//! cookie like a browser would, keeping one shopper's cart across requests.
//!
//! ```bash
//! cargo test -p agritech-integration-tests
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use tower::ServiceExt;

use agritech_core::OrderService;
use agritech_storefront::{
    app, config::StorefrontConfig, content::seed_catalog,
    middleware::session::SESSION_COOKIE_NAME, state::AppState,
};

/// Largest response body the harness will buffer.
const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Boundary used for multipart uploads.
pub const MULTIPART_BOUNDARY: &str = "agritech-test-boundary";

/// Configuration with the mocked services answering immediately.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        mock_latency: Duration::ZERO,
        ..StorefrontConfig::default()
    }
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("response is not JSON ({e}): {}", self.body))
    }

    /// Value of a response header, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// In-process client for one shopper.
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// Client for a storefront using the seed catalog and mocked orders.
    #[must_use]
    pub fn new() -> Self {
        Self::from_state(AppState::with_mock_orders(test_config(), seed_catalog()))
    }

    /// Client for a storefront using the given order backend.
    #[must_use]
    pub fn with_orders(orders: Arc<dyn OrderService>) -> Self {
        Self::from_state(AppState::new(test_config(), seed_catalog(), orders))
    }

    /// Client for a storefront with custom state.
    #[must_use]
    pub fn from_state(state: AppState) -> Self {
        Self {
            router: app(state),
            cookie: None,
        }
    }

    /// A second shopper on the same storefront, without this client's cookie.
    #[must_use]
    pub fn fresh_shopper(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Another handle on this client's shopper, sharing the session cookie.
    #[must_use]
    pub fn same_shopper(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: self.cookie.clone(),
        }
    }

    /// `GET` a page as a browser would.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::get(uri).header(header::ACCEPT, "text/html");
        self.send(request, Body::empty()).await
    }

    /// `GET` a JSON endpoint.
    pub async fn get_json(&mut self, uri: &str) -> TestResponse {
        let request = Request::get(uri).header(header::ACCEPT, "application/json");
        self.send(request, Body::empty()).await
    }

    /// `POST` a form as an HTMX request, answering with the panel fragment.
    pub async fn htmx_post(&mut self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("HX-Request", "true");
        self.send(request, Body::from(encode_form(form))).await
    }

    /// `POST` a form without HTMX, answering with the full page.
    pub async fn post_form(&mut self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::ACCEPT, "text/html");
        self.send(request, Body::from(encode_form(form))).await
    }

    /// `POST` a form expecting JSON back.
    pub async fn post_form_json(&mut self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::ACCEPT, "application/json");
        self.send(request, Body::from(encode_form(form))).await
    }

    /// `POST` one multipart file field expecting JSON back.
    pub async fn post_file(&mut self, uri: &str, field: &str, bytes: &[u8]) -> TestResponse {
        let request = Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .header(header::ACCEPT, "application/json");
        self.send(request, Body::from(multipart_body(field, bytes))).await
    }

    /// Send a request, attaching and then capturing the session cookie.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send(
        &mut self,
        mut request: axum::http::request::Builder,
        body: Body,
    ) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie.as_str());
        }
        let request = request.body(body).expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(cookie) = session_cookie(response.headers()) {
            self.cookie = Some(cookie);
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .expect("readable body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// The `name=value` pair of the session cookie set by a response.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
        .map(str::to_owned)
}

/// Encode form pairs as `application/x-www-form-urlencoded`.
#[must_use]
pub fn encode_form(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(char::from(byte));
            }
            b' ' => encoded.push('+'),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

/// A multipart body with a single file field.
#[must_use]
pub fn multipart_body(field: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{MULTIPART_BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"crop.png\"\r\n\
         Content-Type: image/png\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_form() {
        assert_eq!(
            encode_form(&[("full_name", "Jane Farmer"), ("city", "A&B")]),
            "full_name=Jane+Farmer&city=A%26B"
        );
    }

    #[test]
    fn test_session_cookie_extraction() {
        let mut headers = HeaderMap::new();
        headers.append(
            header::SET_COOKIE,
            format!("{SESSION_COOKIE_NAME}=abc123; HttpOnly; Path=/")
                .parse()
                .expect("valid header"),
        );
        assert_eq!(
            session_cookie(&headers).as_deref(),
            Some("agritech_session=abc123")
        );
    }
}
