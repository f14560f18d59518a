//! Trade records
//!
//! A trade joins one bid and one ask for the same matched quantity; each
//! leg reports the resting price of its own order. Trades are plain values
//! with no references back into the book.

use crate::ids::OrderId;
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// One side of an executed trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeLeg {
    pub order_id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
}

impl TradeLeg {
    pub fn new(order_id: OrderId, price: Price, quantity: Quantity) -> Self {
        Self {
            order_id,
            price,
            quantity,
        }
    }
}

/// An executed match between a bid and an ask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub bid: TradeLeg,
    pub ask: TradeLeg,
}

impl Trade {
    pub fn new(bid: TradeLeg, ask: TradeLeg) -> Self {
        debug_assert_eq!(bid.quantity, ask.quantity, "trade legs must match");
        Self { bid, ask }
    }

    /// The matched quantity (identical on both legs)
    pub fn quantity(&self) -> Quantity {
        self.bid.quantity
    }
}
