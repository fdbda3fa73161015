//! Cart store.
//!
//! [`CartState`] holds the cart lines together with a cached total. Every
//! change goes through [`CartState::apply`], which updates lines and total in
//! the same call so the two can never disagree.
//!
//! ```
//! use agritech_core::{CartCommand, CartState, Price, Product, ProductCategory, ProductId};
//!
//! let seeds = Product {
//!     id: ProductId::new("2"),
//!     name: "Organic Tomato Seeds".to_owned(),
//!     description: String::new(),
//!     price: Price::from_cents(499),
//!     image: String::new(),
//!     category: ProductCategory::Seeds,
//!     stock: 100,
//! };
//!
//! let cart = CartState::default()
//!     .reduce(CartCommand::Add(seeds.clone()))
//!     .reduce(CartCommand::Add(seeds));
//!
//! assert_eq!(cart.line_count(), 1);
//! assert_eq!(cart.total(), Price::from_cents(998));
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// Largest quantity a single line may hold. Larger requests are clamped.
pub const MAX_QUANTITY: u32 = 999;

/// One product in the cart with its quantity.
///
/// Quantity is always between 1 and [`MAX_QUANTITY`]; a line whose quantity
/// would reach zero is removed instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    product: Product,
    quantity: u32,
}

impl CartLine {
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// A command accepted by the cart store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    /// Add one unit of a product.
    Add(Product),
    /// Drop a product's line entirely.
    Remove(ProductId),
    /// Replace a line's quantity. Zero removes the line; values above
    /// [`MAX_QUANTITY`] are clamped.
    SetQuantity { product_id: ProductId, quantity: u32 },
    /// Empty the cart.
    Clear,
}

/// Cart lines in insertion order plus their cached total.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CartState {
    lines: Vec<CartLine>,
    total: Price,
}

impl CartState {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a command, returning whether the cart changed.
    ///
    /// Commands that reference a product not in the cart are no-ops.
    pub fn apply(&mut self, command: CartCommand) -> bool {
        match command {
            CartCommand::Add(product) => {
                if let Some(line) = self.line_mut(&product.id) {
                    if line.quantity >= MAX_QUANTITY {
                        return false;
                    }
                    line.quantity += 1;
                    // Charge the price already on the line so the cached
                    // total stays equal to the sum of line totals.
                    let unit = line.product.price;
                    self.total = self.total + unit;
                } else {
                    self.total = self.total + product.price;
                    self.lines.push(CartLine {
                        product,
                        quantity: 1,
                    });
                }
                true
            }
            CartCommand::Remove(product_id) => self.remove_line(&product_id),
            CartCommand::SetQuantity {
                product_id,
                quantity: 0,
            } => self.remove_line(&product_id),
            CartCommand::SetQuantity {
                product_id,
                quantity,
            } => {
                let quantity = quantity.min(MAX_QUANTITY);
                let Some(line) = self.line_mut(&product_id) else {
                    return false;
                };
                let previous = line.quantity;
                if previous == quantity {
                    return false;
                }
                let unit = line.product.price;
                line.quantity = quantity;
                self.total = if quantity > previous {
                    self.total + unit.times(quantity - previous)
                } else {
                    self.total - unit.times(previous - quantity)
                };
                true
            }
            CartCommand::Clear => {
                let changed = !self.lines.is_empty();
                *self = Self::default();
                changed
            }
        }
    }

    /// Pure form of [`apply`](Self::apply): consume the state and return the next one.
    #[must_use]
    pub fn reduce(mut self, command: CartCommand) -> Self {
        self.apply(command);
        self
    }

    pub fn add_item(&mut self, product: Product) -> bool {
        self.apply(CartCommand::Add(product))
    }

    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        self.apply(CartCommand::Remove(product_id.clone()))
    }

    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        self.apply(CartCommand::SetQuantity {
            product_id: product_id.clone(),
            quantity,
        })
    }

    pub fn clear(&mut self) -> bool {
        self.apply(CartCommand::Clear)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id() == product_id)
    }

    /// Cached total of all lines.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id() == product_id)
    }

    fn remove_line(&mut self, product_id: &ProductId) -> bool {
        let Some(index) = self
            .lines
            .iter()
            .position(|line| line.product_id() == product_id)
        else {
            return false;
        };
        let removed = self.lines.remove(index);
        self.total = self.total - removed.line_total();
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::ProductCategory;

    fn product(id: &str, cents: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::from_cents(cents),
            image: String::new(),
            category: ProductCategory::Tools,
            stock: 10,
        }
    }

    fn recomputed(cart: &CartState) -> Price {
        cart.lines().iter().map(CartLine::line_total).sum()
    }

    fn id(s: &str) -> ProductId {
        ProductId::new(s)
    }

    #[test]
    fn test_add_new_product_appends_line() {
        let mut cart = CartState::new();
        assert!(cart.add_item(product("1", 8999)));
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity(), 1);
        assert_eq!(cart.total(), Price::from_cents(8999));
    }

    #[test]
    fn test_add_same_product_twice_increments_single_line() {
        let mut cart = CartState::new();
        cart.add_item(product("2", 499));
        cart.add_item(product("2", 499));
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.line(&id("2")).unwrap().quantity(), 2);
        assert_eq!(cart.total(), Price::from_cents(998));
    }

    #[test]
    fn test_repeat_add_uses_price_on_line() {
        let mut cart = CartState::new();
        cart.add_item(product("1", 1000));
        // Catalog changed the price between adds.
        cart.add_item(product("1", 1500));
        assert_eq!(cart.total(), Price::from_cents(2000));
        assert_eq!(cart.total(), recomputed(&cart));
    }

    #[test]
    fn test_remove_subtracts_line_total() {
        let mut cart = CartState::new();
        cart.add_item(product("1", 8999));
        cart.add_item(product("2", 499));
        cart.add_item(product("2", 499));
        assert!(cart.remove_item(&id("2")));
        assert_eq!(cart.total(), Price::from_cents(8999));
        assert!(cart.line(&id("2")).is_none());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = CartState::new();
        cart.add_item(product("1", 100));
        let before = cart.clone();
        assert!(!cart.remove_item(&id("404")));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_set_quantity_adjusts_total() {
        let mut cart = CartState::new();
        cart.add_item(product("1", 250));
        assert!(cart.set_quantity(&id("1"), 4));
        assert_eq!(cart.total(), Price::from_cents(1000));
        assert!(cart.set_quantity(&id("1"), 2));
        assert_eq!(cart.total(), Price::from_cents(500));
        assert!(!cart.set_quantity(&id("1"), 2));
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = CartState::new();
        cart.add_item(product("1", 8999));
        cart.add_item(product("2", 499));
        cart.set_quantity(&id("2"), 0);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total(), Price::from_cents(8999));
    }

    #[test]
    fn test_set_quantity_missing_is_noop() {
        let mut cart = CartState::new();
        assert!(!cart.set_quantity(&id("1"), 3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_always_empty() {
        let mut cart = CartState::new();
        cart.add_item(product("1", 100));
        cart.add_item(product("2", 200));
        cart.clear();
        assert_eq!(cart, CartState::default());
        assert_eq!(cart.total(), Price::ZERO);

        // Clearing an empty cart is still empty.
        assert!(!cart.clear());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_then_remove_restores_prior_state() {
        let mut cart = CartState::new();
        cart.add_item(product("1", 8999));
        let before = cart.clone();

        cart.add_item(product("2", 499));
        cart.remove_item(&id("2"));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_total_matches_lines_after_every_command() {
        let commands = [
            CartCommand::Add(product("1", 8999)),
            CartCommand::Add(product("2", 499)),
            CartCommand::Add(product("2", 499)),
            CartCommand::Add(product("3", 2999)),
            CartCommand::SetQuantity {
                product_id: id("3"),
                quantity: 5,
            },
            CartCommand::Remove(id("1")),
            CartCommand::SetQuantity {
                product_id: id("2"),
                quantity: 1,
            },
            CartCommand::Remove(id("missing")),
            CartCommand::Add(product("1", 8999)),
            CartCommand::SetQuantity {
                product_id: id("3"),
                quantity: 0,
            },
        ];

        let mut cart = CartState::new();
        for command in commands {
            cart.apply(command);
            assert_eq!(cart.total(), recomputed(&cart));
            assert!(cart.lines().iter().all(|line| line.quantity() >= 1));
        }
    }

    #[test]
    fn test_quantity_is_capped() {
        let mut cart = CartState::new();
        cart.add_item(product("1", 100));

        assert!(cart.set_quantity(&id("1"), u32::MAX));
        assert_eq!(cart.line(&id("1")).unwrap().quantity(), MAX_QUANTITY);
        assert_eq!(cart.total(), recomputed(&cart));

        assert!(!cart.add_item(product("1", 100)));
        assert_eq!(cart.line(&id("1")).unwrap().quantity(), MAX_QUANTITY);
        assert_eq!(cart.total(), recomputed(&cart));

        assert!(!cart.set_quantity(&id("1"), MAX_QUANTITY + 1));
        assert!(cart.set_quantity(&id("1"), MAX_QUANTITY - 1));
        assert!(cart.add_item(product("1", 100)));
        assert_eq!(cart.total(), Price::from_cents(100 * MAX_QUANTITY));
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let cart = CartState::new()
            .reduce(CartCommand::Add(product("b", 1)))
            .reduce(CartCommand::Add(product("a", 1)))
            .reduce(CartCommand::Add(product("b", 1)));
        let ids: Vec<_> = cart.lines().iter().map(|l| l.product_id().as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_line_serializes_product_fields_with_quantity() {
        let cart = CartState::new().reduce(CartCommand::Add(product("1", 8999)));
        let json = serde_json::to_value(&cart.lines()[0]).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["price"], "89.99");
        assert_eq!(json["quantity"], 1);
    }
}
