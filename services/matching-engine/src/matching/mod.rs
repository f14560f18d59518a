//! Matching logic module
//!
//! Price-time priority: best price wins across levels, FIFO within one.

pub mod crossing;

pub use crossing::can_match;
