//! Order allocation for change events.
//!
//! The allocator is an explicit component owned by the change log rather than
//! a process-wide counter, so any number of engines can live in one process
//! without sharing a sequence.
//!
//! On its own the allocator only guarantees that issued orders are unique and
//! increasing. The change log calls it inside the same critical section as the
//! page append, which additionally makes order and page position agree.

use std::sync::atomic::{AtomicU64, Ordering};

use trs_common::Order;

/// Issues unique, strictly increasing change event orders.
pub struct OrderAllocator {
    /// Next order that will be issued.
    next: AtomicU64,
    /// First order this allocator issued or will issue.
    first: Order,
}

impl OrderAllocator {
    /// Creates an allocator whose first order is [`Order::FIRST`].
    pub fn new() -> Self {
        Self::starting_at(Order::FIRST)
    }

    /// Creates an allocator whose first issued order is `first`.
    pub fn starting_at(first: Order) -> Self {
        Self {
            next: AtomicU64::new(first.as_u64()),
            first,
        }
    }

    /// Issues the next order.
    ///
    /// Returns `None` once the order space is exhausted; an order is never
    /// issued twice.
    pub fn next(&self) -> Option<Order> {
        self.next
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_add(1))
            .ok()
            .map(Order::new)
    }

    /// Returns the order the next call to [`next`](Self::next) would issue.
    pub fn peek(&self) -> Order {
        Order::new(self.next.load(Ordering::Acquire))
    }

    /// Returns the most recently issued order, if any.
    pub fn last_issued(&self) -> Option<Order> {
        let next = self.next.load(Ordering::Acquire);
        if next == self.first.as_u64() {
            None
        } else {
            Some(Order::new(next - 1))
        }
    }
}

impl Default for OrderAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OrderAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderAllocator")
            .field("next", &self.peek())
            .field("first", &self.first)
            .finish()
    }
}
