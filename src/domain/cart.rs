//! Per-user pending-quantity map. Cart mutations never check live stock
//! (soft reservation); contention is resolved at order placement.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Maps product id to pending quantity. Holds no zero entries: setting a
/// quantity to zero removes the line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: HashMap<Uuid, i64>,
}

impl Cart {
    pub fn add(&mut self, product_id: Uuid, quantity: i64) {
        if quantity <= 0 {
            return;
        }
        *self.items.entry(product_id).or_insert(0) += quantity;
    }

    pub fn set_quantity(&mut self, product_id: Uuid, quantity: i64) {
        if quantity <= 0 {
            self.items.remove(&product_id);
        } else {
            self.items.insert(product_id, quantity);
        }
    }

    pub fn remove(&mut self, product_id: Uuid) {
        self.items.remove(&product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total pending quantity across all lines (UI badge).
    pub fn count(&self) -> i64 {
        self.items.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn quantity_of(&self, product_id: Uuid) -> i64 {
        self.items.get(&product_id).copied().unwrap_or(0)
    }

    pub fn items(&self) -> &HashMap<Uuid, i64> {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> Uuid {
        Uuid::new_v4()
    }

    #[test]
    fn add_accumulates_quantity() {
        let mut cart = Cart::default();
        let product = id();
        cart.add(product, 2);
        cart.add(product, 3);
        assert_eq!(cart.quantity_of(product), 5);
        assert_eq!(cart.count(), 5);
    }

    #[test]
    fn set_zero_removes_and_is_idempotent() {
        let mut cart = Cart::default();
        let product = id();
        cart.add(product, 4);

        cart.set_quantity(product, 0);
        assert_eq!(cart.quantity_of(product), 0);
        assert!(cart.is_empty());

        // Second removal leaves the cart unchanged.
        cart.set_quantity(product, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn set_replaces_rather_than_accumulates() {
        let mut cart = Cart::default();
        let product = id();
        cart.add(product, 2);
        cart.set_quantity(product, 7);
        assert_eq!(cart.quantity_of(product), 7);
    }

    #[test]
    fn count_sums_across_lines() {
        let mut cart = Cart::default();
        cart.add(id(), 1);
        cart.add(id(), 2);
        cart.add(id(), 3);
        assert_eq!(cart.count(), 6);
    }

    #[test]
    fn clear_empties_everything() {
        let mut cart = Cart::default();
        cart.add(id(), 2);
        cart.add(id(), 5);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn nonpositive_add_is_ignored() {
        let mut cart = Cart::default();
        cart.add(id(), 0);
        cart.add(id(), -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut cart = Cart::default();
        let product = id();
        cart.add(product, 2);
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json[product.to_string()], 2);

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }
}
