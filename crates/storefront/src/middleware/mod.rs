//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame options, caching)
//! 5. Session layer (tower-sessions with in-memory store)
//!
//! `CurrentShopper` is an extractor rather than a layer; handlers that touch
//! the cart or checkout take it as an argument.

pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod shopper;

pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use shopper::CurrentShopper;
