//! Order lifecycle types
//!
//! An [`Order`] is created at admission, mutated only by [`Order::fill`],
//! and retired when fully filled, cancelled, or expired.

use crate::ids::OrderId;
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order time-in-force and entry semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Rests until filled or explicitly cancelled
    GoodTillCancel,
    /// Match what crosses immediately, cancel the remainder
    FillAndKill,
    /// Full immediate match or reject entirely
    FillOrKill,
    /// Rests until filled, cancelled, or the session-end sweep
    GoodForDay,
    /// No limit price; rewritten at admission to the worst opposite price
    Market,
}

/// A single order's mutable state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Price,
    pub initial_quantity: Quantity,
    pub remaining_quantity: Quantity,
}

impl Order {
    /// Create a new order; remaining quantity starts at the initial quantity
    pub fn new(
        order_type: OrderType,
        order_id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            order_id,
            side,
            order_type,
            price,
            initial_quantity: quantity,
            remaining_quantity: quantity,
        }
    }

    /// Create a market order; the price is assigned at admission
    pub fn market(order_id: OrderId, side: Side, quantity: Quantity) -> Self {
        Self::new(OrderType::Market, order_id, side, Price::INVALID, quantity)
    }

    /// Quantity matched so far
    pub fn filled_quantity(&self) -> Quantity {
        self.initial_quantity - self.remaining_quantity
    }

    /// Check if the order is completely filled
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    /// Reduce remaining quantity after a match
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining quantity; the book must be
    /// considered corrupt after such a call.
    pub fn fill(&mut self, quantity: Quantity) {
        assert!(
            quantity <= self.remaining_quantity,
            "order ({}) cannot be filled for more than its remaining quantity",
            self.order_id
        );
        self.remaining_quantity -= quantity;
    }

    /// Rewrite a market order into a resting limit order at `price`
    pub fn to_good_till_cancel(&mut self, price: Price) {
        self.order_type = OrderType::GoodTillCancel;
        self.price = price;
    }
}

/// Replacement parameters for an existing order
///
/// A modify is cancel-then-add: the new order keeps the original id and
/// type but joins the back of its level queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderModify {
    pub order_id: OrderId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

impl OrderModify {
    pub fn new(order_id: OrderId, side: Side, price: Price, quantity: Quantity) -> Self {
        Self {
            order_id,
            side,
            price,
            quantity,
        }
    }

    /// Build the replacement order, carrying over the original's type
    pub fn into_order(self, order_type: OrderType) -> Order {
        Order::new(
            order_type,
            self.order_id,
            self.side,
            self.price,
            self.quantity,
        )
    }
}
