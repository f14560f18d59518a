//! Bid (buy-side) price ladder
//!
//! Maintains buy levels sorted by price descending (best bid first).
//! BTreeMap keeps iteration deterministic; descending walks use `rev()`.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};

use super::price_level::PriceLevel;

/// Bid (buy) side of the book
///
/// Levels are keyed by price; the highest price is the best bid. Within a
/// level, orders are maintained in FIFO order.
#[derive(Debug, Clone, Default)]
pub struct BidBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl BidBook {
    /// Create a new empty bid ladder
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

    /// Best (highest) bid price
    pub fn best_price(&self) -> Option<Price> {
        // BTreeMap iter is ascending, so the best bid is the last key
        self.levels.keys().next_back().copied()
    }

    /// Worst (lowest) bid price
    pub fn worst_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// Mutable access to the best bid level
    pub(crate) fn best_level_mut(&mut self) -> Option<(Price, &mut PriceLevel)> {
        self.levels
            .iter_mut()
            .next_back()
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

    /// Iterate levels in priority order (highest price first)
    pub fn iter(&self) -> impl Iterator<Item = (Price, &PriceLevel)> {
        self.levels.iter().rev().map(|(price, level)| (*price, level))
    }

    /// Check if the bid ladder is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bid_book_best_and_worst() {
        let mut book = BidBook::new();
        book.insert(OrderId::new(1), Price::new(100), Quantity::new(1));
        book.insert(OrderId::new(2), Price::new(102), Quantity::new(2));
        book.insert(OrderId::new(3), Price::new(98), Quantity::new(3));

        assert_eq!(book.best_price(), Some(Price::new(102)));
        assert_eq!(book.worst_price(), Some(Price::new(98)));
        assert_eq!(book.level_count(), 3);
    }

    #[test]
    fn test_bid_book_priority_iteration() {
        let mut book = BidBook::new();
        book.insert(OrderId::new(1), Price::new(100), Quantity::new(1));
        book.insert(OrderId::new(2), Price::new(102), Quantity::new(2));
        book.insert(OrderId::new(3), Price::new(98), Quantity::new(3));

        let prices: Vec<Price> = book.iter().map(|(price, _)| price).collect();
        assert_eq!(
            prices,
            vec![Price::new(102), Price::new(100), Price::new(98)]
        );
    }

    #[test]
    fn test_bid_book_remove_erases_empty_level() {
        let mut book = BidBook::new();
        book.insert(OrderId::new(1), Price::new(100), Quantity::new(1));

        assert!(book.remove(OrderId::new(1), Price::new(100), Quantity::new(1)));
        assert!(book.is_empty());
        assert!(!book.remove(OrderId::new(1), Price::new(100), Quantity::new(1)));
    }

    #[test]
    fn test_bid_book_same_price_shares_level() {
        let mut book = BidBook::new();
        book.insert(OrderId::new(1), Price::new(100), Quantity::new(1));
        book.insert(OrderId::new(2), Price::new(100), Quantity::new(2));

        assert_eq!(book.level_count(), 1);
        let level = book.level(Price::new(100)).unwrap();
        assert_eq!(level.order_count(), 2);
        assert_eq!(level.total_quantity(), Quantity::new(3));
    }
}
