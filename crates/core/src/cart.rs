//! Client-held shopping cart.
//!
//! The cart is never persisted server-side. It is a map from product ID to a
//! line holding the product snapshot and a quantity of at least one. Every
//! operation is pure and infallible.

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::api::OrderLineRequest;
use crate::product::Product;
use crate::types::{Price, ProductId};

/// One cart line: a product and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product snapshot taken when it was first added.
    pub product: Product,
    /// Quantity, always at least one.
    pub quantity: NonZeroU32,
}

impl CartItem {
    /// Price of this line (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity.get())
    }
}

/// A shopping cart keyed by product ID.
///
/// ```
/// use crown_shop_core::{Cart, Price, Product, ProductId};
///
/// let tiara = Product {
///     id: ProductId::new(1),
///     title: "Tiara".into(),
///     price: Price::from_cents(10_000),
///     images: vec![],
///     stock: 3,
///     category: "crown".into(),
/// };
///
/// let mut cart = Cart::new();
/// cart.add(&tiara);
/// cart.add(&tiara);
/// assert_eq!(cart.item_count(), 2);
/// assert_eq!(cart.total(), Price::from_cents(20_000));
///
/// cart.remove(ProductId::new(1));
/// assert!(cart.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: BTreeMap<ProductId, CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// Add one unit of `product`.
    ///
    /// If the product is already in the cart its quantity goes up by one;
    /// otherwise a new line with quantity one is inserted.
    pub fn add(&mut self, product: &Product) {
        self.items
            .entry(product.id)
            .and_modify(|item| item.quantity = item.quantity.saturating_add(1))
            .or_insert_with(|| CartItem {
                product: product.clone(),
                quantity: NonZeroU32::MIN,
            });
    }

    /// Remove the line for `product_id`. Missing IDs are ignored.
    pub fn remove(&mut self, product_id: ProductId) {
        self.items.remove(&product_id);
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of price times quantity over all lines; zero when empty.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.values().map(CartItem::line_total).sum()
    }

    /// Total number of units (the header badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .values()
            .map(|item| item.quantity.get())
            .fold(0, u32::saturating_add)
    }

    /// Quantity of `product_id`, or zero if absent.
    #[must_use]
    pub fn quantity(&self, product_id: ProductId) -> u32 {
        self.items
            .get(&product_id)
            .map_or(0, |item| item.quantity.get())
    }

    /// Line total for `product_id`, if present.
    #[must_use]
    pub fn line_total(&self, product_id: ProductId) -> Option<Price> {
        self.items.get(&product_id).map(CartItem::line_total)
    }

    /// Lines ordered by product ID.
    pub fn items(&self) -> impl Iterator<Item = &CartItem> {
        self.items.values()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The `[{id, quantity}]` lines sent with an order.
    #[must_use]
    pub fn order_lines(&self) -> Vec<OrderLineRequest> {
        self.items
            .values()
            .map(|item| OrderLineRequest {
                id: item.product.id,
                quantity: item.quantity.get(),
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn product(id: i32, cents: u32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents),
            images: Vec::new(),
            stock: 10,
            category: "crown".to_string(),
        }
    }

    #[test]
    fn test_add_increments_instead_of_duplicating() {
        let tiara = product(1, 10_000);
        let mut cart = Cart::new();
        cart.add(&tiara);
        cart.add(&tiara);
        cart.add(&tiara);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity(tiara.id), 3);
        assert_eq!(cart.line_total(tiara.id), Some(Price::from_cents(30_000)));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product(1, 100));
        cart.remove(ProductId::new(99));
        assert_eq!(cart.len(), 1);

        let mut empty = Cart::new();
        empty.remove(ProductId::new(1));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_empty_total_is_zero() {
        assert_eq!(Cart::new().total(), Price::ZERO);
        assert_eq!(Cart::new().item_count(), 0);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(&product(1, 100));
        cart.add(&product(2, 200));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_order_lines_follow_product_order() {
        let mut cart = Cart::new();
        cart.add(&product(5, 100));
        cart.add(&product(2, 100));
        cart.add(&product(5, 100));

        let lines = cart.order_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].id, ProductId::new(2));
        assert_eq!(lines[0].quantity, 1);
        assert_eq!(lines[1].id, ProductId::new(5));
        assert_eq!(lines[1].quantity, 2);
    }

    /// Replays a fixed pseudo-random sequence of adds and removes and checks
    /// the cart against a naive model after every step.
    #[test]
    fn test_total_matches_model_for_operation_sequences() {
        let catalog: Vec<Product> = (1..=6)
            .map(|id| product(id, u32::try_from(id).unwrap() * 1_234))
            .collect();

        let mut cart = Cart::new();
        let mut model: HashMap<ProductId, u32> = HashMap::new();
        let mut seed: u32 = 0x2545_F491;

        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let pick = &catalog[(seed % 6) as usize];

            if seed % 4 == 0 {
                cart.remove(pick.id);
                model.remove(&pick.id);
            } else {
                cart.add(pick);
                *model.entry(pick.id).or_insert(0) += 1;
            }

            let expected: Price = model
                .iter()
                .map(|(id, qty)| {
                    let unit = catalog.iter().find(|p| p.id == *id).unwrap().price;
                    unit.times(*qty)
                })
                .sum();
            assert_eq!(cart.total(), expected);

            for p in &catalog {
                assert_eq!(cart.quantity(p.id), model.get(&p.id).copied().unwrap_or(0));
            }
        }
    }
}
