//! Tick-denominated numeric types for prices and quantities
//!
//! Prices are signed 32-bit tick counts, quantities unsigned 32-bit contract
//! counts. Integer representation keeps matching arithmetic exact and cheap.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Limit price in ticks
///
/// Market orders carry [`Price::INVALID`] until admission rewrites them;
/// the sentinel must never reach an ordering comparison, so ladder and
/// matching code guards entry points with [`Price::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i32);

impl Price {
    /// Sentinel carried by market orders before admission assigns a real price
    pub const INVALID: Price = Price(i32::MIN);

    /// Create a new Price from a tick count
    pub fn new(ticks: i32) -> Self {
        Self(ticks)
    }

    /// Get the tick count
    pub fn ticks(&self) -> i32 {
        self.0
    }

    /// False for the market-order sentinel
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

impl From<i32> for Price {
    fn from(ticks: i32) -> Self {
        Self(ticks)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "MKT")
        }
    }
}

/// Order quantity in contracts
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// Create a new Quantity
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Zero quantity
    pub fn zero() -> Self {
        Self(0)
    }

    /// Get the raw contract count
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Check if quantity is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Smaller of two quantities
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        assert!(
            self.0 >= rhs.0,
            "Quantity subtraction would result in negative"
        );
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
