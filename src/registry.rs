//! Order Registry - The single owner of canonical order state.
//!
//! Price levels hold only identifiers; every lookup of side, price, or
//! remaining quantity goes through the registry. Keeping one mutable owner
//! is what lets cancel, amend, and matching share state without drift.

use rustc_hash::FxHashMap;

use crate::order::{LimitOrder, OrderId};

/// O(1) order lookup keyed by external order id.
#[derive(Clone, Debug, Default)]
pub struct OrderRegistry {
    orders: FxHashMap<OrderId, LimitOrder>,
}

impl OrderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            orders: FxHashMap::default(),
        }
    }

    /// Create a registry with pre-allocated capacity
    pub fn with_capacity(orders: usize) -> Self {
        Self {
            orders: FxHashMap::with_capacity_and_hasher(orders, Default::default()),
        }
    }

    /// Store an order's canonical state.
    ///
    /// Duplicate-submission protection: if the id is already active the
    /// registry is left untouched.
    ///
    /// # Returns
    /// `true` if the order was stored, `false` if the id was already active
    pub fn insert(&mut self, order: LimitOrder) -> bool {
        if self.orders.contains_key(&order.id) {
            return false;
        }
        self.orders.insert(order.id, order);
        true
    }

    /// Look up an order by id.
    #[inline]
    pub fn get(&self, id: OrderId) -> Option<&LimitOrder> {
        self.orders.get(&id)
    }

    /// Look up an order by id (mutable, for fills and amendments).
    #[inline]
    pub fn get_mut(&mut self, id: OrderId) -> Option<&mut LimitOrder> {
        self.orders.get_mut(&id)
    }

    /// Remove an order, returning its final state if it was active.
    #[inline]
    pub fn remove(&mut self, id: OrderId) -> Option<LimitOrder> {
        self.orders.remove(&id)
    }

    /// Check whether an id is active.
    #[inline]
    pub fn contains(&self, id: OrderId) -> bool {
        self.orders.contains_key(&id)
    }

    /// Number of active orders
    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Returns true if no orders are active
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Side;

    fn order(id: OrderId, price: f64, qty: u64) -> LimitOrder {
        LimitOrder {
            id,
            side: Side::Bid,
            price,
            qty,
            seq: id,
            timestamp_ns: 0,
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut registry = OrderRegistry::new();
        assert!(registry.insert(order(1, 50.25, 100)));

        let stored = registry.get(1).unwrap();
        assert_eq!(stored.price, 50.25);
        assert_eq!(stored.qty, 100);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(1));
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let mut registry = OrderRegistry::new();
        assert!(registry.insert(order(1, 50.25, 100)));
        assert!(!registry.insert(order(1, 99.0, 500)));

        // Original state untouched
        let stored = registry.get(1).unwrap();
        assert_eq!(stored.price, 50.25);
        assert_eq!(stored.qty, 100);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut registry = OrderRegistry::new();
        registry.insert(order(1, 50.25, 100));

        let removed = registry.remove(1).unwrap();
        assert_eq!(removed.id, 1);
        assert!(registry.is_empty());
        assert!(registry.remove(1).is_none());
    }

    #[test]
    fn test_mutate_quantity() {
        let mut registry = OrderRegistry::new();
        registry.insert(order(1, 50.25, 100));

        registry.get_mut(1).unwrap().qty -= 40;
        assert_eq!(registry.get(1).unwrap().qty, 60);
    }
}
