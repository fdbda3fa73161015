//! AgriTech Core - Shared domain library for the marketplace.
//!
//! This crate provides the types and state machines used by the storefront:
//! - `storefront` - Public site, marketplace, and checkout (axum)
//! - `integration-tests` - In-process HTTP tests
//!
//! # Architecture
//!
//! The core crate contains only types, state transitions, and traits - no I/O,
//! no HTTP, no clocks. The one external collaborator (order placement) is an
//! async trait implemented by the storefront.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, and categories
//! - [`catalog`] - Read-only product catalog
//! - [`cart`] - Cart store and its commands
//! - [`address`] - Delivery address draft and validation
//! - [`order`] - Order service seam and its results
//! - [`checkout`] - Checkout state machine
//! - [`session`] - Per-visitor cart + checkout aggregate

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod address;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod order;
pub mod session;
pub mod types;

pub use address::{AddressError, AddressField, DeliveryAddress};
pub use cart::{CartCommand, CartLine, CartState, MAX_QUANTITY};
pub use catalog::{Catalog, CatalogError, Product};
pub use checkout::{CheckoutError, CheckoutFlow, CheckoutStage, SubmissionOutcome, SubmissionTicket};
pub use order::{OrderConfirmation, OrderError, OrderReceipt, OrderService};
pub use session::ShoppingSession;
pub use types::*;
