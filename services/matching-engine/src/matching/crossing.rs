//! Crossing detection logic
//!
//! Determines when a bid and ask can match based on price compatibility.
//! Prices reaching these predicates are always real limits; the market
//! sentinel is rewritten away at admission.

use types::numeric::Price;
use types::order::Side;

/// Check if a bid and ask can match at given prices
///
/// A buy matches a sell as soon as the bid price reaches the ask price.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    debug_assert!(bid_price.is_valid() && ask_price.is_valid());
    bid_price >= ask_price
}

/// Check if an incoming order price crosses a resting order price
pub fn incoming_can_match(incoming_side: Side, incoming_price: Price, resting_price: Price) -> bool {
    match incoming_side {
        Side::Buy => incoming_price >= resting_price,
        Side::Sell => incoming_price <= resting_price,
    }
}
