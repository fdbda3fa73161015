//! Business logic services for storefront.
//!
//! # Services
//!
//! - `orders` - Mocked order placement behind the core `OrderService` trait
//! - `shoppers` - In-memory per-visitor cart and checkout state
//! - `checkout` - Single-flight order submission (timeout, resolution)
//! - `insights` - Mocked crop disease detection and yield prediction

pub mod checkout;
pub mod insights;
pub mod orders;
pub mod shoppers;

pub use checkout::submit_order;
pub use insights::{DiseaseReport, InsightService, SoilType, YieldInputs, YieldPrediction};
pub use orders::MockOrderService;
pub use shoppers::{SharedSession, ShopperStore};
