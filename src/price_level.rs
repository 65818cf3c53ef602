//! Price Level - A FIFO queue of order ids at a single price point.
//!
//! The level holds identifiers only; canonical order state lives in the
//! registry. The aggregate quantity is maintained incrementally and must
//! always equal the sum of the referenced orders' remaining quantities.

use std::collections::VecDeque;

use crate::order::OrderId;

/// A queue of resting orders at a specific price.
///
/// Orders are matched in FIFO order (price-time priority). Removal from an
/// arbitrary position scans linearly; acceptable for small books, and the
/// scan preserves the relative order of the remainder.
#[derive(Clone, Debug)]
pub struct PriceLevel {
    /// Price shared by every order at this level
    price: f64,
    /// Order ids, oldest at the front (highest priority, first to match)
    queue: VecDeque<OrderId>,
    /// Total remaining quantity across all orders at this level
    total_qty: u64,
}

impl PriceLevel {
    /// Create a new empty price level
    #[inline]
    pub fn new(price: f64) -> Self {
        Self {
            price,
            queue: VecDeque::new(),
            total_qty: 0,
        }
    }

    /// The price this level aggregates
    #[inline]
    pub const fn price(&self) -> f64 {
        self.price
    }

    /// Total remaining quantity across all orders at this level
    #[inline]
    pub const fn total_qty(&self) -> u64 {
        self.total_qty
    }

    /// Number of orders at this level
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if there are no orders at this level
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Append an order to the tail of the queue (newest, last to match).
    ///
    /// # Complexity
    /// O(1)
    #[inline]
    pub fn push_back(&mut self, id: OrderId, qty: u64) {
        self.queue.push_back(id);
        self.total_qty += qty;
    }

    /// Remove an order from anywhere in the queue (for cancel).
    ///
    /// Scans for the id, removes it preserving the relative order of the
    /// remaining entries, and subtracts `qty` from the aggregate.
    ///
    /// # Returns
    /// `true` if the id was found and removed.
    ///
    /// # Complexity
    /// O(n) in the number of orders at this level
    pub fn remove(&mut self, id: OrderId, qty: u64) -> bool {
        match self.queue.iter().position(|&queued| queued == id) {
            Some(pos) => {
                self.queue.remove(pos);
                debug_assert!(self.total_qty >= qty);
                self.total_qty -= qty;
                true
            }
            None => false,
        }
    }

    /// Remove and return the head order (oldest/highest priority).
    ///
    /// `qty` is the remaining quantity of the head order and is subtracted
    /// from the aggregate.
    ///
    /// # Complexity
    /// O(1)
    #[inline]
    pub fn pop_front(&mut self, qty: u64) -> Option<OrderId> {
        let id = self.queue.pop_front()?;
        debug_assert!(self.total_qty >= qty);
        self.total_qty -= qty;
        Some(id)
    }

    /// Peek at the head order without removing it.
    #[inline]
    pub fn front(&self) -> Option<OrderId> {
        self.queue.front().copied()
    }

    /// Rebase the aggregate for an in-place quantity amendment.
    ///
    /// The order keeps its queue position; only the aggregate moves by the
    /// delta between the old and new quantity.
    #[inline]
    pub fn adjust_qty(&mut self, old_qty: u64, new_qty: u64) {
        debug_assert!(self.total_qty >= old_qty);
        self.total_qty = self.total_qty - old_qty + new_qty;
    }

    /// Update the aggregate after a partial fill.
    ///
    /// Call this after decrementing the order's qty in the registry.
    #[inline]
    pub fn subtract_qty(&mut self, qty: u64) {
        debug_assert!(self.total_qty >= qty);
        self.total_qty -= qty;
    }

    /// Iterate order ids in FIFO order (oldest first), read-only.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.queue.iter().copied()
    }
}
