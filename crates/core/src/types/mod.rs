//! Core types for the AgriTech marketplace.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;

pub use category::ProductCategory;
pub use id::*;
pub use price::{Price, PriceError};
