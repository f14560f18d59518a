//! Ask (sell-side) price ladder
//!
//! Maintains sell levels sorted by price ascending (best ask first).

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};

use super::price_level::PriceLevel;

/// Ask (sell) side of the book
///
/// Levels are keyed by price; the lowest price is the best ask. Within a
/// level, orders are maintained in FIFO order.
#[derive(Debug, Clone, Default)]
pub struct AskBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl AskBook {
    /// Create a new empty ask ladder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an order at the back of its price level
    pub fn insert(&mut self, order_id: OrderId, price: Price, quantity: Quantity) {
        self.levels
            .entry(price)
            .or_default()
            .push_back(order_id, quantity);
    }

    /// Remove an order from its level, erasing the level if it empties
    ///
    /// Returns true if the order was found and removed
    pub fn remove(&mut self, order_id: OrderId, price: Price, remaining: Quantity) -> bool {
        if let Some(level) = self.levels.get_mut(&price) {
            if level.remove(order_id, remaining) {
                if level.is_empty() {
                    self.levels.remove(&price);
                }
                return true;
            }
        }
        false
    }

    /// Best (lowest) ask price
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// Worst (highest) ask price
    pub fn worst_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
    }

    /// Mutable access to the best ask level
    pub(crate) fn best_level_mut(&mut self) -> Option<(Price, &mut PriceLevel)> {
        self.levels
            .iter_mut()
            .next()
            .map(|(price, level)| (*price, level))
    }

    /// Level at an exact price
    pub fn level(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    /// Drop the level at `price` once its queue has drained
    pub(crate) fn erase_if_empty(&mut self, price: Price) {
        if let Some(level) = self.levels.get(&price) {
            if level.is_empty() {
                self.levels.remove(&price);
            }
        }
    }

    /// Iterate levels in priority order (lowest price first)
    pub fn iter(&self) -> impl Iterator<Item = (Price, &PriceLevel)> {
        self.levels.iter().map(|(price, level)| (*price, level))
    }

    /// Check if the ask ladder is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
