//! Core identifier types for the TRS engine.
//!
//! These types provide type-safe wrappers around numeric identifiers,
//! preventing accidental misuse of change-event orders as page indices.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Change event order - the position of an event in the global ingestion
/// order.
///
/// Orders are assigned exactly once, at ingestion, and are:
/// - Unique for the lifetime of an engine
/// - Strictly increasing in assignment order
/// - Never reused, even for two events with identical payloads
///
/// # Example
///
/// ```rust
/// use trs_common::types::Order;
///
/// let order = Order::new(7);
/// assert!(order > Order::FIRST);
/// assert_eq!(order.next().as_u64(), 8);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Order(u64);

impl Order {
    /// Order handed to the first event of a fresh engine.
    pub const FIRST: Self = Self(1);

    /// Creates a new `Order` from a raw u64 value.
    #[inline]
    #[must_use]
    pub const fn new(order: u64) -> Self {
        Self(order)
    }

    /// Returns the raw u64 value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the order that follows this one.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Debug for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order({})", self.0)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Order {
    #[inline]
    fn from(order: u64) -> Self {
        Self::new(order)
    }
}

impl From<Order> for u64 {
    #[inline]
    fn from(order: Order) -> Self {
        order.0
    }
}

/// Selects one of the two paged feeds an engine exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feed {
    /// The immutable base snapshot.
    Base,
    /// The append-only change log.
    ChangeLog,
}

impl Feed {
    /// Returns the lowercase feed name, also used as its path segment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base => crate::constants::BASE_SEGMENT,
            Self::ChangeLog => crate::constants::CHANGELOG_SEGMENT,
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order() {
        let order = Order::new(42);
        assert_eq!(order.as_u64(), 42);
        assert_eq!(order.next(), Order::new(43));
        assert!(Order::FIRST < order);
        assert_eq!(Order::new(u64::MAX).next(), Order::new(u64::MAX));
    }

    #[test]
    fn test_order_conversions() {
        let order: Order = 9u64.into();
        let raw: u64 = order.into();
        assert_eq!(raw, 9);
        assert_eq!(format!("{order}"), "9");
        assert_eq!(format!("{order:?}"), "Order(9)");
    }

    #[test]
    fn test_order_serializes_as_number() {
        let json = serde_json::to_string(&Order::new(5)).unwrap();
        assert_eq!(json, "5");
    }

    #[test]
    fn test_feed_names() {
        assert_eq!(Feed::Base.to_string(), "base");
        assert_eq!(Feed::ChangeLog.to_string(), "changelog");
    }
}
