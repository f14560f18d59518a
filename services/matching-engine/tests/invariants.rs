//! Randomized invariant sweep
//!
//! Drives the engine through a long seeded operation sequence and checks
//! the structural invariants after every step: index/ladder agreement,
//! statistics consistency, an uncrossed book, and conservation of traded
//! quantity between the tape and the order records.

use std::collections::{HashMap, HashSet};

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use matching_engine::book::Book;
use matching_engine::Engine;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderModify, OrderType, Side};
use types::trade::Trade;

const SEED: u64 = 0x0bb0_cafe;
const OPS: usize = 2_000;

/// Tape-side ledger: per-order filled quantity accumulated from trades
///
/// A modify replaces its order with a fresh instance under the same id, so
/// the replaced instance's fills move to the `retired` bucket.
#[derive(Default)]
struct Ledger {
    fills: HashMap<OrderId, u64>,
    retired: u64,
    total_traded: u64,
}

impl Ledger {
    fn record(&mut self, trades: &[Trade]) {
        for trade in trades {
            let qty = u64::from(trade.quantity().raw());
            *self.fills.entry(trade.bid.order_id).or_default() += qty;
            *self.fills.entry(trade.ask.order_id).or_default() += qty;
            self.total_traded += qty;
        }
    }

    fn retire(&mut self, order_id: OrderId) {
        if let Some(qty) = self.fills.remove(&order_id) {
            self.retired += qty;
        }
    }

    fn filled(&self, order_id: OrderId) -> u64 {
        self.fills.get(&order_id).copied().unwrap_or(0)
    }
}

fn check_invariants(book: &Book, ledger: &Ledger) {
    let bid_levels: Vec<_> = book.bids().iter().collect();
    let ask_levels: Vec<_> = book.asks().iter().collect();

    // Index cardinality equals the sum of level-queue lengths.
    let queued: usize = bid_levels
        .iter()
        .chain(ask_levels.iter())
        .map(|(_, level)| level.iter().count())
        .sum();
    assert_eq!(book.order_count(), queued, "index out of sync with ladders");

    // A level whose queue drained must have been erased from its ladder,
    // so the distinct prices of queued orders account for every level; a
    // retained empty level would leave the count one high.
    let bid_prices: HashSet<Price> = bid_levels
        .iter()
        .flat_map(|(_, level)| level.iter())
        .map(|order_id| book.order(order_id).unwrap().price)
        .collect();
    assert_eq!(
        book.bids().level_count(),
        bid_prices.len(),
        "bid ladder retains a drained level"
    );
    let ask_prices: HashSet<Price> = ask_levels
        .iter()
        .flat_map(|(_, level)| level.iter())
        .map(|order_id| book.order(order_id).unwrap().price)
        .collect();
    assert_eq!(
        book.asks().level_count(),
        ask_prices.len(),
        "ask ladder retains a drained level"
    );

    // Statistics match the queue at every level.
    for (price, level) in bid_levels.iter().chain(ask_levels.iter()) {
        assert_eq!(
            level.order_count() as usize,
            level.iter().count(),
            "level count statistic wrong at {price}"
        );

        let mut aggregate = Quantity::zero();
        for order_id in level.iter() {
            let order = book
                .order(order_id)
                .unwrap_or_else(|| panic!("queued order {order_id} missing from index"));
            assert_eq!(order.price, *price, "order queued at the wrong level");
            assert!(order.remaining_quantity <= order.initial_quantity);
            assert!(!order.remaining_quantity.is_zero(), "retired order queued");
            aggregate += order.remaining_quantity;
        }
        assert_eq!(
            level.total_quantity(),
            aggregate,
            "level aggregate statistic wrong at {price}"
        );
    }

    // The book is uncrossed after every operation.
    if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
        assert!(bid < ask, "book crossed: bid {bid} >= ask {ask}");
    }

    // Tape and order records agree on every live order's fills.
    for (_, level) in bid_levels.iter().chain(ask_levels.iter()) {
        for order_id in level.iter() {
            let order = book.order(order_id).unwrap();
            assert_eq!(
                u64::from(order.filled_quantity().raw()),
                ledger.filled(order_id),
                "tape disagrees with order {order_id}"
            );
        }
    }

    // Each trade quantity is counted once per leg.
    let leg_total: u64 = ledger.fills.values().sum::<u64>() + ledger.retired;
    assert_eq!(leg_total, 2 * ledger.total_traded);
}

fn random_order(rng: &mut ChaCha8Rng, next_id: &mut u32) -> Order {
    let id = *next_id;
    *next_id += 1;

    let side = if rng.gen_bool(0.5) {
        Side::Buy
    } else {
        Side::Sell
    };
    let price = Price::new(rng.gen_range(95..=105));
    let quantity = Quantity::new(rng.gen_range(1..=20));

    let order_type = match rng.gen_range(0..10) {
        0..=4 => OrderType::GoodTillCancel,
        5..=6 => OrderType::GoodForDay,
        7 => OrderType::FillAndKill,
        8 => OrderType::FillOrKill,
        _ => OrderType::Market,
    };

    if order_type == OrderType::Market {
        Order::market(OrderId::new(id), side, quantity)
    } else {
        Order::new(order_type, OrderId::new(id), side, price, quantity)
    }
}

#[test]
fn random_operation_sweep_holds_invariants() {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let mut engine = Engine::new();
    let mut ledger = Ledger::default();
    let mut next_id: u32 = 1;
    let mut submitted: Vec<OrderId> = Vec::new();

    for _ in 0..OPS {
        match rng.gen_range(0..100) {
            0..=59 => {
                let order = random_order(&mut rng, &mut next_id);
                submitted.push(order.order_id);
                let trades = engine.add_order(order);
                ledger.record(&trades);
            }
            60..=84 => {
                if let Some(order_id) = submitted.choose(&mut rng) {
                    engine.cancel_order(*order_id);
                }
            }
            _ => {
                if let Some(order_id) = submitted.choose(&mut rng).copied() {
                    let modify = OrderModify::new(
                        order_id,
                        if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell },
                        Price::new(rng.gen_range(95..=105)),
                        Quantity::new(rng.gen_range(1..=20)),
                    );
                    // The replacement starts with fresh fill state.
                    if engine.book().contains(order_id) {
                        ledger.retire(order_id);
                    }
                    let trades = engine.modify_order(modify);
                    ledger.record(&trades);
                }
            }
        }

        check_invariants(engine.book(), &ledger);
    }

    // The sweep must actually exercise the matcher.
    assert!(ledger.total_traded > 0, "seed produced no trades");
}

#[test]
fn same_seed_reproduces_the_same_book() {
    let run = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut engine = Engine::new();
        let mut next_id: u32 = 1;

        for _ in 0..500 {
            let order = random_order(&mut rng, &mut next_id);
            engine.add_order(order);
        }
        (engine.order_count(), engine.snapshot())
    };

    assert_eq!(run(SEED), run(SEED));
}
