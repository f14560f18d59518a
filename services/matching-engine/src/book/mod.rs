//! Order book state
//!
//! Both price ladders, the order index, and the per-level statistics.
//! The index owns every live order record; the ladder queues reference
//! orders by id, so retirement always removes from both places.

pub mod ask_book;
pub mod bid_book;
pub mod price_level;

pub use ask_book::AskBook;
pub use bid_book::BidBook;
pub use price_level::{LevelAction, LevelData, PriceLevel};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderType, Side};
use types::trade::TradeLeg;

use crate::matching::crossing;

/// Aggregate view of one price level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub price: Price,
    pub quantity: Quantity,
}

/// Per-level view of both sides: bids best-first (descending), asks
/// best-first (ascending)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub bids: Vec<LevelInfo>,
    pub asks: Vec<LevelInfo>,
}

/// The full book: dual ladders plus the id index
#[derive(Debug, Clone, Default)]
pub struct Book {
    bids: BidBook,
    asks: AskBook,
    orders: HashMap<OrderId, Order>,
}

impl Book {
    /// Create an empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether an order id is live
    pub fn contains(&self, order_id: OrderId) -> bool {
        self.orders.contains_key(&order_id)
    }

    /// Look up a live order
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    /// Number of live orders
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Bid-side ladder
    pub fn bids(&self) -> &BidBook {
        &self.bids
    }

    /// Ask-side ladder
    pub fn asks(&self) -> &AskBook {
        &self.asks
    }

    /// Best (highest) bid price
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Best (lowest) ask price
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Head order id at the best bid level
    pub fn best_bid_front(&self) -> Option<OrderId> {
        self.bids
            .best_price()
            .and_then(|price| self.bids.level(price))
            .and_then(PriceLevel::front)
    }

    /// Head order id at the best ask level
    pub fn best_ask_front(&self) -> Option<OrderId> {
        self.asks
            .best_price()
            .and_then(|price| self.asks.level(price))
            .and_then(PriceLevel::front)
    }

    /// Remaining quantity of the head order at a side's best level
    pub fn front_remaining(&self, side: Side) -> Option<Quantity> {
        let order_id = match side {
            Side::Buy => self.best_bid_front()?,
            Side::Sell => self.best_ask_front()?,
        };
        self.orders.get(&order_id).map(|o| o.remaining_quantity)
    }

    /// Register an order at the tail of its (side, price) queue
    ///
    /// The caller has already admitted the order: the id is unique and the
    /// price is a real limit.
    pub fn insert(&mut self, order: Order) {
        debug_assert!(order.price.is_valid(), "inserting the market sentinel");
        debug_assert!(!self.contains(order.order_id), "duplicate insert");

        match order.side {
            Side::Buy => self
                .bids
                .insert(order.order_id, order.price, order.remaining_quantity),
            Side::Sell => self
                .asks
                .insert(order.order_id, order.price, order.remaining_quantity),
        }
        self.orders.insert(order.order_id, order);
    }

    /// Retire an order from both the index and its level queue
    ///
    /// Returns the removed order, or None for unknown ids.
    pub fn remove(&mut self, order_id: OrderId) -> Option<Order> {
        let order = self.orders.remove(&order_id)?;
        let removed = match order.side {
            Side::Buy => self
                .bids
                .remove(order_id, order.price, order.remaining_quantity),
            Side::Sell => self
                .asks
                .remove(order_id, order.price, order.remaining_quantity),
        };
        debug_assert!(removed, "order index and ladder out of sync");
        Some(order)
    }

    /// Fill the head order at a side's best level and settle the level
    ///
    /// Fully consumed orders are popped and retired; partial fills update
    /// the level statistics in place. Returns the trade leg for the fill.
    pub(crate) fn fill_front_at_best(&mut self, side: Side, quantity: Quantity) -> TradeLeg {
        let (price, level) = match side {
            Side::Buy => self.bids.best_level_mut(),
            Side::Sell => self.asks.best_level_mut(),
        }
        .expect("matching requires a non-empty ladder");

        let order_id = level.front().expect("ladder level is never empty");
        let order = self
            .orders
            .get_mut(&order_id)
            .expect("queued order missing from index");

        order.fill(quantity);

        if order.is_filled() {
            level.remove_front(quantity);
            self.orders.remove(&order_id);
            match side {
                Side::Buy => self.bids.erase_if_empty(price),
                Side::Sell => self.asks.erase_if_empty(price),
            }
        } else {
            level.match_front(quantity);
        }

        TradeLeg::new(order_id, price, quantity)
    }

    /// Check whether an incoming (side, price) crosses the opposite best
    pub fn can_match(&self, side: Side, price: Price) -> bool {
        let resting = match side {
            Side::Buy => self.asks.best_price(),
            Side::Sell => self.bids.best_price(),
        };
        resting.map_or(false, |best| {
            crossing::incoming_can_match(side, price, best)
        })
    }

    /// Check whether `quantity` can be fully matched within the limit
    ///
    /// Walks opposing levels best-first, consuming the cached per-level
    /// aggregates; levels beyond the limit are never visited, so the check
    /// is linear in acceptable levels rather than resting orders.
    pub fn can_fully_fill(&self, side: Side, price: Price, quantity: Quantity) -> bool {
        if !self.can_match(side, price) {
            return false;
        }

        let mut needed = quantity;
        match side {
            Side::Buy => {
                for (level_price, level) in self.asks.iter() {
                    if !crossing::incoming_can_match(side, price, level_price) {
                        break;
                    }
                    if needed <= level.total_quantity() {
                        return true;
                    }
                    needed -= level.total_quantity();
                }
            }
            Side::Sell => {
                for (level_price, level) in self.bids.iter() {
                    if !crossing::incoming_can_match(side, price, level_price) {
                        break;
                    }
                    if needed <= level.total_quantity() {
                        return true;
                    }
                    needed -= level.total_quantity();
                }
            }
        }
        false
    }

    /// Worst opposite price: the last level a sweeping order could reach
    pub fn worst_opposite_price(&self, side: Side) -> Option<Price> {
        match side {
            Side::Buy => self.asks.worst_price(),
            Side::Sell => self.bids.worst_price(),
        }
    }

    /// Ids of all resting good-for-day orders, in id order
    pub fn good_for_day_ids(&self) -> Vec<OrderId> {
        let mut ids: Vec<OrderId> = self
            .orders
            .values()
            .filter(|order| order.order_type == OrderType::GoodForDay)
            .map(|order| order.order_id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Per-level aggregate view of both sides
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            bids: self
                .bids
                .iter()
                .map(|(price, level)| LevelInfo {
                    price,
                    quantity: level.total_quantity(),
                })
                .collect(),
            asks: self
                .asks
                .iter()
                .map(|(price, level)| LevelInfo {
                    price,
                    quantity: level.total_quantity(),
                })
                .collect(),
        }
    }
}
