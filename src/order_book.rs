//! Order Book - The central limit order book data structure.
//!
//! Composes two ordered side indexes with the order registry, and owns the
//! structural plumbing shared by every operation: enqueue, unlink, empty
//! level eviction, and the invariant audit used by property tests.

use crate::order::{BookError, LimitOrder, OrderId, Side};
use crate::registry::OrderRegistry;
use crate::side_index::SideIndex;

/// A single-instrument limit order book.
///
/// The registry is the only owner of order state; levels reference orders
/// by id. Every active order appears exactly once in exactly one level on
/// exactly one side, and exactly once in the registry.
pub struct OrderBook {
    /// Bid price levels (buy orders), best = highest price
    pub(crate) bids: SideIndex,
    /// Ask price levels (sell orders), best = lowest price
    pub(crate) asks: SideIndex,
    /// Canonical order state, keyed by id
    pub(crate) registry: OrderRegistry,
}

impl OrderBook {
    /// Create a new empty order book
    pub fn new() -> Self {
        Self {
            bids: SideIndex::new(Side::Bid),
            asks: SideIndex::new(Side::Ask),
            registry: OrderRegistry::new(),
        }
    }

    /// Create a new order book with a pre-allocated registry
    pub fn with_capacity(orders: usize) -> Self {
        Self {
            bids: SideIndex::new(Side::Bid),
            asks: SideIndex::new(Side::Ask),
            registry: OrderRegistry::with_capacity(orders),
        }
    }

    // ========================================================================
    // Side Access
    // ========================================================================

    /// The index for one side of the book
    #[inline]
    pub fn side(&self, side: Side) -> &SideIndex {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    #[inline]
    pub(crate) fn side_mut(&mut self, side: Side) -> &mut SideIndex {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    /// Get the best bid price (highest buy price)
    #[inline]
    pub fn best_bid(&self) -> Option<f64> {
        self.bids.best_price()
    }

    /// Get the best ask price (lowest sell price)
    #[inline]
    pub fn best_ask(&self) -> Option<f64> {
        self.asks.best_price()
    }

    /// Returns true if best bid >= best ask (both sides non-empty).
    ///
    /// A completed operation must never leave the book in this state.
    #[inline]
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => bid >= ask,
            _ => false,
        }
    }

    // ========================================================================
    // Structural Mutation
    // ========================================================================

    /// Register an order and enqueue it at the tail of its price level.
    ///
    /// Does not run matching; callers that can create a cross must uncross
    /// afterwards.
    ///
    /// # Returns
    /// `true` if the order was enqueued, `false` on a duplicate id (book
    /// left untouched)
    pub fn insert(&mut self, order: LimitOrder) -> bool {
        if !self.registry.insert(order) {
            return false;
        }
        self.side_mut(order.side)
            .get_or_create(order.price)
            .push_back(order.id, order.qty);
        true
    }

    /// Unlink an order: dequeue it from its level, evict the level if now
    /// empty, and deregister it.
    ///
    /// # Returns
    /// The order's final state, or `None` if the id was not active
    pub fn remove(&mut self, id: OrderId) -> Option<LimitOrder> {
        let order = self.registry.remove(id)?;
        let index = self.side_mut(order.side);
        if let Some(level) = index.get_mut(order.price) {
            level.remove(id, order.qty);
            index.evict_if_empty(order.price);
        }
        Some(order)
    }

    // ========================================================================
    // Order Access
    // ========================================================================

    /// Look up an active order by id.
    #[inline]
    pub fn order(&self, id: OrderId) -> Option<&LimitOrder> {
        self.registry.get(id)
    }

    /// Check if an order is active.
    #[inline]
    pub fn contains_order(&self, id: OrderId) -> bool {
        self.registry.contains(id)
    }

    /// Get the total number of active orders
    #[inline]
    pub fn order_count(&self) -> usize {
        self.registry.len()
    }

    /// Check if the book is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    // ========================================================================
    // Invariant Audit
    // ========================================================================

    /// Verify the cross-structure invariants.
    ///
    /// Checks that every queued id resolves to a registry entry on the
    /// right side at the right price, that level aggregates equal the sum
    /// of their orders' remaining quantities, that no empty level stays
    /// indexed, that registry and level populations agree, and that the
    /// book is not crossed.
    pub fn audit(&self) -> Result<(), BookError> {
        let mut queued = 0usize;
        for index in [&self.bids, &self.asks] {
            for level in index.iter_best_first() {
                if level.is_empty() {
                    return Err(BookError::Corrupted("empty level left indexed"));
                }
                let mut level_sum = 0u64;
                for id in level.iter() {
                    let order = self
                        .registry
                        .get(id)
                        .ok_or(BookError::Corrupted("queued id missing from registry"))?;
                    if order.side != index.side() {
                        return Err(BookError::Corrupted("order queued on wrong side"));
                    }
                    if order.price != level.price() {
                        return Err(BookError::Corrupted("order queued at wrong price"));
                    }
                    level_sum += order.qty;
                    queued += 1;
                }
                if level_sum != level.total_qty() {
                    return Err(BookError::Corrupted("level aggregate out of sync"));
                }
            }
        }
        if queued != self.registry.len() {
            return Err(BookError::Corrupted("registry and level populations differ"));
        }
        if self.is_crossed() {
            return Err(BookError::Corrupted("book left crossed"));
        }
        Ok(())
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBook")
            .field("best_bid", &self.best_bid())
            .field("best_ask", &self.best_ask())
            .field("bid_levels", &self.bids.len())
            .field("ask_levels", &self.asks.len())
            .field("order_count", &self.registry.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: OrderId, side: Side, price: f64, qty: u64) -> LimitOrder {
        LimitOrder {
            id,
            side,
            price,
            qty,
            seq: id,
            timestamp_ns: 0,
        }
    }

    #[test]
    fn test_empty_book() {
        let book = OrderBook::new();
        assert!(book.is_empty());
        assert_eq!(book.best_bid(), None);
        assert_eq!(book.best_ask(), None);
        assert!(!book.is_crossed());
        book.audit().unwrap();
    }

    #[test]
    fn test_insert_bid() {
        let mut book = OrderBook::new();
        assert!(book.insert(order(1, Side::Bid, 50.25, 100)));

        assert_eq!(book.best_bid(), Some(50.25));
        assert_eq!(book.best_ask(), None);
        assert_eq!(book.order_count(), 1);
        assert!(book.contains_order(1));
        book.audit().unwrap();
    }

    #[test]
    fn test_insert_duplicate_id_is_noop() {
        let mut book = OrderBook::new();
        assert!(book.insert(order(1, Side::Bid, 50.25, 100)));
        assert!(!book.insert(order(1, Side::Ask, 51.00, 500)));

        assert_eq!(book.order_count(), 1);
        assert_eq!(book.order(1).unwrap().price, 50.25);
        assert_eq!(book.best_ask(), None);
        book.audit().unwrap();
    }

    #[test]
    fn test_best_price_tracking() {
        let mut book = OrderBook::new();
        book.insert(order(1, Side::Bid, 50.00, 100));
        book.insert(order(2, Side::Bid, 50.50, 100));
        book.insert(order(3, Side::Bid, 49.50, 100));
        assert_eq!(book.best_bid(), Some(50.50)); // Higher is better for bids

        book.insert(order(4, Side::Ask, 51.00, 100));
        book.insert(order(5, Side::Ask, 50.80, 100));
        assert_eq!(book.best_ask(), Some(50.80)); // Lower is better for asks
        book.audit().unwrap();
    }

    #[test]
    fn test_remove_evicts_empty_level() {
        let mut book = OrderBook::new();
        book.insert(order(1, Side::Bid, 50.50, 100));
        book.insert(order(2, Side::Bid, 50.25, 100));

        let removed = book.remove(1).unwrap();
        assert_eq!(removed.price, 50.50);
        assert_eq!(removed.qty, 100);

        // Best falls back to the next level; the 50.50 level is gone
        assert_eq!(book.best_bid(), Some(50.25));
        assert_eq!(book.side(Side::Bid).len(), 1);
        book.audit().unwrap();
    }

    #[test]
    fn test_remove_keeps_populated_level() {
        let mut book = OrderBook::new();
        book.insert(order(1, Side::Bid, 50.25, 100));
        book.insert(order(2, Side::Bid, 50.25, 200));
        book.insert(order(3, Side::Bid, 50.25, 300));

        book.remove(2);
        let level = book.side(Side::Bid).get(50.25).unwrap();
        assert_eq!(level.total_qty(), 400);
        assert_eq!(level.iter().collect::<Vec<_>>(), vec![1, 3]);
        book.audit().unwrap();
    }

    #[test]
    fn test_remove_unknown_id() {
        let mut book = OrderBook::new();
        assert!(book.remove(9999).is_none());
    }

    #[test]
    fn test_audit_detects_aggregate_drift() {
        let mut book = OrderBook::new();
        book.insert(order(1, Side::Bid, 50.25, 100));

        // Desync the aggregate behind the audit's back
        book.bids.get_mut(50.25).unwrap().subtract_qty(10);
        assert_eq!(
            book.audit(),
            Err(BookError::Corrupted("level aggregate out of sync"))
        );
    }
}
