//! Matching engine core
//!
//! Single-threaded admission, matching, and amendment logic over the book
//! state. Thread safety lives one layer up in [`crate::orderbook`].
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced
//! - The book is uncrossed whenever a public call returns
//! - Level statistics always agree with the queued orders

use tracing::{debug, warn};
use types::ids::OrderId;
use types::order::{Order, OrderModify, OrderType, Side};
use types::trade::Trade;

use crate::book::{Book, BookSnapshot};
use crate::matching::crossing;

/// The matching core: owns the book and applies every state transition
#[derive(Debug, Default)]
pub struct Engine {
    book: Book,
}

impl Engine {
    /// Create an engine over an empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the book state
    pub fn book(&self) -> &Book {
        &self.book
    }

    /// Number of live orders
    pub fn order_count(&self) -> usize {
        self.book.order_count()
    }

    /// Per-level aggregate view of both sides
    pub fn snapshot(&self) -> BookSnapshot {
        self.book.snapshot()
    }

    /// Ids of all resting good-for-day orders
    pub fn good_for_day_ids(&self) -> Vec<OrderId> {
        self.book.good_for_day_ids()
    }

    /// Admit an order and run the matching loop
    ///
    /// Rejections (duplicate id, market order against an empty side,
    /// fill-and-kill with nothing to cross, infeasible fill-or-kill) return
    /// an empty trade list. Accepted orders are queued and matched; the
    /// returned trades are the tape for this submission.
    pub fn add_order(&mut self, mut order: Order) -> Vec<Trade> {
        if order.remaining_quantity.is_zero() {
            warn!(order_id = %order.order_id, "rejecting zero-quantity order");
            return Vec::new();
        }
        if order.order_type != OrderType::Market && !order.price.is_valid() {
            warn!(order_id = %order.order_id, "rejecting limit order without a price");
            return Vec::new();
        }
        if self.book.contains(order.order_id) {
            debug!(order_id = %order.order_id, "duplicate order id ignored");
            return Vec::new();
        }

        if order.order_type == OrderType::Market {
            // Sweep the whole opposite ladder: rest at its worst price.
            match self.book.worst_opposite_price(order.side) {
                Some(worst) => order.to_good_till_cancel(worst),
                None => {
                    debug!(order_id = %order.order_id, "market order rejected: empty opposite side");
                    return Vec::new();
                }
            }
        }

        if order.order_type == OrderType::FillAndKill
            && !self.book.can_match(order.side, order.price)
        {
            debug!(order_id = %order.order_id, "fill-and-kill rejected: nothing crosses");
            return Vec::new();
        }

        if order.order_type == OrderType::FillOrKill
            && !self
                .book
                .can_fully_fill(order.side, order.price, order.remaining_quantity)
        {
            debug!(order_id = %order.order_id, "fill-or-kill rejected: insufficient depth");
            return Vec::new();
        }

        debug!(
            order_id = %order.order_id,
            side = ?order.side,
            order_type = ?order.order_type,
            price = %order.price,
            quantity = %order.remaining_quantity,
            "order accepted"
        );

        self.book.insert(order);
        self.match_orders()
    }

    /// Cancel a live order; unknown ids are ignored
    pub fn cancel_order(&mut self, order_id: OrderId) {
        if let Some(order) = self.book.remove(order_id) {
            debug!(
                order_id = %order.order_id,
                remaining = %order.remaining_quantity,
                "order cancelled"
            );
        }
    }

    /// Cancel a batch of orders
    pub fn cancel_orders(&mut self, order_ids: &[OrderId]) {
        for order_id in order_ids {
            self.cancel_order(*order_id);
        }
    }

    /// Replace a live order, keeping its id and type
    ///
    /// Implemented as cancel-then-add, so the replacement joins the back of
    /// its level queue. Unknown ids are ignored.
    pub fn modify_order(&mut self, modify: OrderModify) -> Vec<Trade> {
        let order_type = match self.book.order(modify.order_id) {
            Some(order) => order.order_type,
            None => return Vec::new(),
        };

        self.cancel_order(modify.order_id);
        self.add_order(modify.into_order(order_type))
    }

    /// Drain all crossing volume from the top of the book
    ///
    /// Repeatedly fills the two head orders at the best crossing prices for
    /// the smaller remaining quantity; each trade carries both resting
    /// prices. Afterwards a fill-and-kill order left at either head is
    /// cancelled: its arrival wave is over.
    fn match_orders(&mut self) -> Vec<Trade> {
        let mut trades = Vec::new();

        loop {
            let (bid_price, ask_price) = match (self.book.best_bid(), self.book.best_ask()) {
                (Some(bid), Some(ask)) => (bid, ask),
                _ => break,
            };
            if !crossing::can_match(bid_price, ask_price) {
                break;
            }

            let quantity = match (
                self.book.front_remaining(Side::Buy),
                self.book.front_remaining(Side::Sell),
            ) {
                (Some(bid), Some(ask)) => bid.min(ask),
                _ => break,
            };

            let bid_leg = self.book.fill_front_at_best(Side::Buy, quantity);
            let ask_leg = self.book.fill_front_at_best(Side::Sell, quantity);

            debug!(
                bid_order_id = %bid_leg.order_id,
                ask_order_id = %ask_leg.order_id,
                bid_price = %bid_leg.price,
                ask_price = %ask_leg.price,
                quantity = %quantity,
                "trade executed"
            );

            trades.push(Trade::new(bid_leg, ask_leg));
        }

        self.cancel_fill_and_kill_residue();
        trades
    }

    /// Cancel an unfilled fill-and-kill remainder left at either head
    fn cancel_fill_and_kill_residue(&mut self) {
        if let Some(order_id) = self.book.best_bid_front() {
            if self.order_type_of(order_id) == Some(OrderType::FillAndKill) {
                self.cancel_order(order_id);
            }
        }
        if let Some(order_id) = self.book.best_ask_front() {
            if self.order_type_of(order_id) == Some(OrderType::FillAndKill) {
                self.cancel_order(order_id);
            }
        }
    }

    fn order_type_of(&self, order_id: OrderId) -> Option<OrderType> {
        self.book.order(order_id).map(|order| order.order_type)
    }
}
