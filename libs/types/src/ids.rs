//! Unique identifier types
//!
//! Order ids are assigned by the submitting client and must be unique per
//! live order; the book rejects duplicates at admission.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u32);

impl OrderId {
    /// Create an OrderId from a raw id
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_equality() {
        assert_eq!(OrderId::new(7), OrderId::from(7));
        assert_ne!(OrderId::new(7), OrderId::new(8));
    }

    #[test]
    fn test_order_id_serialization() {
        let id = OrderId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");

        let deserialized: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
