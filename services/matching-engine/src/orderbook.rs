//! Thread-safe order book facade
//!
//! One coarse lock guards all book state; every public call holds it for
//! its full duration, so callers observe each operation atomically. A
//! background worker sweeps good-for-day orders at the session end and is
//! signalled and joined on shutdown.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::debug;
use types::ids::OrderId;
use types::order::{Order, OrderModify};
use types::trade::Trade;

use crate::book::BookSnapshot;
use crate::engine::Engine;
use crate::expiry::{self, LocalSessionClock, SessionClock};

/// State shared between the facade and the expiry worker
pub(crate) struct Shared {
    pub(crate) engine: Mutex<Engine>,
    pub(crate) shutdown: AtomicBool,
    pub(crate) prune_signal: Condvar,
}

impl Shared {
    pub(crate) fn is_shut_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    pub(crate) fn cancel_orders(&self, order_ids: &[OrderId]) {
        self.engine.lock().cancel_orders(order_ids);
    }
}

/// Concurrent order book over the single-threaded [`Engine`]
///
/// Mutating calls after [`Orderbook::shutdown`] are ignored and return
/// empty; read calls keep reporting the final book state.
pub struct Orderbook {
    shared: Arc<Shared>,
    pruner: Mutex<Option<JoinHandle<()>>>,
}

impl Orderbook {
    /// Create a book whose good-for-day orders expire at 16:00 local time
    pub fn new() -> Self {
        Self::with_clock(LocalSessionClock::default())
    }

    /// Create a book with a caller-supplied session clock
    pub fn with_clock<C: SessionClock>(clock: C) -> Self {
        let shared = Arc::new(Shared {
            engine: Mutex::new(Engine::new()),
            shutdown: AtomicBool::new(false),
            prune_signal: Condvar::new(),
        });

        let pruner = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || expiry::prune_good_for_day_orders(shared, clock))
        };

        Self {
            shared,
            pruner: Mutex::new(Some(pruner)),
        }
    }

    /// Admit an order and return the trades it produced
    pub fn add_order(&self, order: Order) -> Vec<Trade> {
        if self.shared.is_shut_down() {
            return Vec::new();
        }
        self.shared.engine.lock().add_order(order)
    }

    /// Cancel a live order; unknown ids are ignored
    pub fn cancel_order(&self, order_id: OrderId) {
        if self.shared.is_shut_down() {
            return;
        }
        self.shared.engine.lock().cancel_order(order_id);
    }

    /// Cancel a batch of orders under one lock acquisition
    pub fn cancel_orders(&self, order_ids: &[OrderId]) {
        if self.shared.is_shut_down() {
            return;
        }
        self.shared.cancel_orders(order_ids);
    }

    /// Replace a live order, keeping its id and type
    pub fn modify_order(&self, modify: OrderModify) -> Vec<Trade> {
        if self.shared.is_shut_down() {
            return Vec::new();
        }
        self.shared.engine.lock().modify_order(modify)
    }

    /// Number of live orders
    pub fn order_count(&self) -> usize {
        self.shared.engine.lock().order_count()
    }

    /// Consistent per-level view of both sides
    pub fn snapshot(&self) -> BookSnapshot {
        self.shared.engine.lock().snapshot()
    }

    /// Stop accepting mutations and join the expiry worker
    ///
    /// Idempotent; also runs on drop.
    pub fn shutdown(&self) {
        {
            // Taking the book lock closes the race against a worker that
            // has checked the flag and is about to wait.
            let _engine = self.shared.engine.lock();
            if self.shared.shutdown.swap(true, Ordering::AcqRel) {
                return;
            }
        }
        self.shared.prune_signal.notify_all();

        if let Some(handle) = self.pruner.lock().take() {
            let _ = handle.join();
        }
        debug!("order book shut down");
    }
}

impl Default for Orderbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Orderbook {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::numeric::{Price, Quantity};
    use types::order::{OrderType, Side};

    fn gtc(id: u32, side: Side, price: i32, qty: u32) -> Order {
        Order::new(
            OrderType::GoodTillCancel,
            OrderId::new(id),
            side,
            Price::new(price),
            Quantity::new(qty),
        )
    }

    #[test]
    fn test_orderbook_add_and_cancel() {
        let book = Orderbook::new();

        let trades = book.add_order(gtc(1, Side::Buy, 100, 10));
        assert!(trades.is_empty());
        assert_eq!(book.order_count(), 1);

        book.cancel_order(OrderId::new(1));
        assert_eq!(book.order_count(), 0);
    }

    #[test]
    fn test_orderbook_shutdown_rejects_mutations() {
        let book = Orderbook::new();
        book.add_order(gtc(1, Side::Buy, 100, 10));

        book.shutdown();

        assert!(book.add_order(gtc(2, Side::Sell, 100, 10)).is_empty());
        book.cancel_order(OrderId::new(1));
        // The resting order is untouched after shutdown.
        assert_eq!(book.order_count(), 1);
    }

    #[test]
    fn test_orderbook_shutdown_is_idempotent() {
        let book = Orderbook::new();
        book.shutdown();
        book.shutdown();
    }
}
