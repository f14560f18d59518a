//! Price level implementation with FIFO queue
//!
//! A price level holds all live orders at one price, in arrival order, plus
//! the cached statistics the fill-or-kill feasibility check reads. Orders
//! are stored by id; the order records themselves live in the book's index.

use std::collections::VecDeque;
use types::ids::OrderId;
use types::numeric::Quantity;

/// Cached per-level statistics
///
/// `quantity` is the sum of remaining quantities of the queued orders and
/// `count` their number; both are maintained incrementally so feasibility
/// checks never walk the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelData {
    quantity: Quantity,
    count: u32,
}

/// Statistics transition applied alongside a queue mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelAction {
    /// An order joined the level
    Add,
    /// An order left the level (cancel or final fill)
    Remove,
    /// An order was partially filled and stays queued
    Match,
}

impl LevelData {
    /// Total remaining quantity at this level
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Number of live orders at this level
    pub fn count(&self) -> u32 {
        self.count
    }

    fn apply(&mut self, action: LevelAction, quantity: Quantity) {
        match action {
            LevelAction::Add => {
                self.count += 1;
                self.quantity += quantity;
            }
            LevelAction::Remove => {
                debug_assert!(self.count > 0, "removing from an empty level");
                self.count -= 1;
                self.quantity -= quantity;
            }
            LevelAction::Match => {
                self.quantity -= quantity;
            }
        }
    }
}

/// A price level containing orders at a single price
///
/// Maintains strict FIFO ordering for time priority. The queue stores order
/// ids; an id doubles as the stable handle for mid-queue removal.
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    orders: VecDeque<OrderId>,
    data: LevelData,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an order at the back of the queue (time priority)
    pub fn push_back(&mut self, order_id: OrderId, quantity: Quantity) {
        self.orders.push_back(order_id);
        self.data.apply(LevelAction::Add, quantity);
    }

    /// Remove an order from anywhere in the queue
    ///
    /// `remaining` is the order's remaining quantity, charged against the
    /// level aggregate. Returns false if the id is not queued here.
    pub fn remove(&mut self, order_id: OrderId, remaining: Quantity) -> bool {
        let Some(position) = self.orders.iter().position(|id| *id == order_id) else {
            return false;
        };
        self.orders.remove(position);
        self.data.apply(LevelAction::Remove, remaining);
        true
    }

    /// Peek at the front order id without removing it
    pub fn front(&self) -> Option<OrderId> {
        self.orders.front().copied()
    }

    /// Pop the front order after its final fill of `quantity`
    pub fn remove_front(&mut self, quantity: Quantity) -> Option<OrderId> {
        let order_id = self.orders.pop_front()?;
        self.data.apply(LevelAction::Remove, quantity);
        Some(order_id)
    }

    /// Record a partial fill of `quantity` against the front order
    pub fn match_front(&mut self, quantity: Quantity) {
        debug_assert!(!self.orders.is_empty(), "matching against an empty level");
        self.data.apply(LevelAction::Match, quantity);
    }

    /// Check if the price level is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Cached statistics for this level
    pub fn data(&self) -> LevelData {
        self.data
    }

    /// Total remaining quantity at this level
    pub fn total_quantity(&self) -> Quantity {
        self.data.quantity
    }

    /// Number of orders at this level
    pub fn order_count(&self) -> u32 {
        self.data.count
    }

    /// Iterate queued order ids in FIFO order
    pub fn iter(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.orders.iter().copied()
    }
}
