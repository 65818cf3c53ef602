//! Matching Engine - Core order matching algorithm.
//!
//! Implements the enqueue/uncross algorithm:
//! 1. ENQUEUE: The incoming order is registered and rested at its level
//! 2. UNCROSS: While best bid >= best ask, the oldest order on each best
//!    level trades the overlapping quantity until the book uncrosses
//!
//! Matching runs only after insertion (and after a price-changing
//! amendment, which re-inserts). Cancels and same-price amendments cannot
//! create a cross, so they never run the loop.

use tracing::{debug, error, trace};

use crate::order::{BookError, LimitOrder, OrderId, Side, TradeEvent};
use crate::order_book::OrderBook;
use crate::price_level::PriceLevel;

/// The matching engine: the public operation surface over the book.
pub struct MatchingEngine {
    /// The limit order book
    pub book: OrderBook,
}

impl MatchingEngine {
    /// Create a new matching engine over an empty book
    pub fn new() -> Self {
        Self {
            book: OrderBook::new(),
        }
    }

    /// Create a matching engine with a pre-allocated order registry
    pub fn with_capacity(orders: usize) -> Self {
        Self {
            book: OrderBook::with_capacity(orders),
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Submit a limit order.
    ///
    /// The order is registered, rested at the tail of its price level, and
    /// the uncross loop then resolves any crossing to exhaustion. A single
    /// insertion may trade against multiple resting orders.
    ///
    /// # Returns
    /// The trades emitted while uncrossing (empty if the order rested
    /// without crossing), or `Err(DuplicateOrderId)` with zero side effects
    /// if the id is already active.
    pub fn add_order(&mut self, order: LimitOrder) -> Result<Vec<TradeEvent>, BookError> {
        if !self.book.insert(order) {
            return Err(BookError::DuplicateOrderId(order.id));
        }
        debug!(
            id = order.id,
            side = ?order.side,
            price = order.price,
            qty = order.qty,
            "order accepted"
        );
        Ok(self.uncross())
    }

    /// Cancel an active order.
    ///
    /// Removes the id from its level (preserving the relative order of the
    /// remaining entries), evicts the level if now empty, and deregisters
    /// the order. Never runs matching.
    ///
    /// # Returns
    /// `true` if the order was canceled, `false` if the id was unknown
    pub fn cancel_order(&mut self, id: OrderId) -> bool {
        match self.book.remove(id) {
            Some(order) => {
                debug!(id, canceled_qty = order.qty, "order canceled");
                true
            }
            None => false,
        }
    }

    /// Amend an active order's price and/or quantity.
    ///
    /// A price change is cancel-plus-reinsert under the same id: the order
    /// re-enters at the tail of the new level, forfeiting its queue
    /// position and time priority, and the insert may match immediately. A
    /// same-price amendment updates the quantity in place, keeping FIFO
    /// position; it cannot create a cross, so matching is not run.
    ///
    /// # Returns
    /// Trades triggered by a price-changing amendment (always empty for a
    /// same-price amendment), or `Err(UnknownOrderId)`.
    pub fn amend_order(
        &mut self,
        id: OrderId,
        new_price: f64,
        new_qty: u64,
    ) -> Result<Vec<TradeEvent>, BookError> {
        let current = *self.book.order(id).ok_or(BookError::UnknownOrderId(id))?;

        if current.price != new_price {
            self.book.remove(id);
            let replacement = LimitOrder {
                price: new_price,
                qty: new_qty,
                ..current
            };
            // The id was freed by the removal above, so this cannot collide
            self.book.insert(replacement);
            debug!(
                id,
                old_price = current.price,
                new_price,
                new_qty,
                "order amended (price change, queue position lost)"
            );
            return Ok(self.uncross());
        }

        if let Some(level) = self.book.side_mut(current.side).get_mut(current.price) {
            level.adjust_qty(current.qty, new_qty);
        }
        if let Some(order) = self.book.registry.get_mut(id) {
            order.qty = new_qty;
        }
        debug!(id, new_qty, "order amended in place");
        Ok(Vec::new())
    }

    // ========================================================================
    // Uncross Loop
    // ========================================================================

    /// Resolve a crossed book to exhaustion.
    ///
    /// Each iteration matches the oldest resting bid at the best bid price
    /// against the oldest resting ask at the best ask price for the
    /// overlapping quantity, then removes whichever side(s) filled
    /// completely. Terminates when either side empties or best bid < best
    /// ask.
    fn uncross(&mut self) -> Vec<TradeEvent> {
        let mut trades = Vec::new();

        loop {
            let (bid_price, ask_price) = match (self.book.best_bid(), self.book.best_ask()) {
                (Some(bid), Some(ask)) => (bid, ask),
                _ => break, // A side is empty
            };
            if bid_price < ask_price {
                break; // Book is uncrossed
            }

            // Heads of the two best levels. An indexed level with an empty
            // queue violates the invariants; abort instead of reading
            // invalid state.
            let (Some(bid_id), Some(ask_id)) = (
                self.book.bids.get(bid_price).and_then(PriceLevel::front),
                self.book.asks.get(ask_price).and_then(PriceLevel::front),
            ) else {
                error!(bid_price, ask_price, "indexed level with empty queue, aborting uncross");
                break;
            };

            let (Some(bid_rem), Some(ask_rem)) = (
                self.book.order(bid_id).map(|o| o.qty),
                self.book.order(ask_id).map(|o| o.qty),
            ) else {
                error!(bid_id, ask_id, "queued id missing from registry, aborting uncross");
                break;
            };

            // A zero-quantity head (reachable via amend-to-zero) matches
            // nothing; drop it without a trade and keep uncrossing
            if bid_rem == 0 {
                self.remove_filled(Side::Bid, bid_price, bid_id);
                continue;
            }
            if ask_rem == 0 {
                self.remove_filled(Side::Ask, ask_price, ask_id);
                continue;
            }

            let match_qty = bid_rem.min(ask_rem);

            // Decrement both orders and both level aggregates by the delta
            if let Some(order) = self.book.registry.get_mut(bid_id) {
                order.qty -= match_qty;
            }
            if let Some(order) = self.book.registry.get_mut(ask_id) {
                order.qty -= match_qty;
            }
            if let Some(level) = self.book.bids.get_mut(bid_price) {
                level.subtract_qty(match_qty);
            }
            if let Some(level) = self.book.asks.get_mut(ask_price) {
                level.subtract_qty(match_qty);
            }

            trace!(
                resting_bid_id = bid_id,
                resting_ask_id = ask_id,
                bid_price,
                ask_price,
                qty = match_qty,
                "trade"
            );
            trades.push(TradeEvent {
                resting_bid_id: bid_id,
                resting_ask_id: ask_id,
                bid_price,
                ask_price,
                qty: match_qty,
            });

            // Fully filled orders leave their level; empty levels leave the index
            if bid_rem == match_qty {
                self.remove_filled(Side::Bid, bid_price, bid_id);
            }
            if ask_rem == match_qty {
                self.remove_filled(Side::Ask, ask_price, ask_id);
            }
        }

        trades
    }

    /// Remove an order with no remaining quantity from the head of its
    /// level and the registry, evicting the level if it emptied.
    fn remove_filled(&mut self, side: Side, price: f64, id: OrderId) {
        let index = self.book.side_mut(side);
        if let Some(level) = index.get_mut(price) {
            // Aggregate was already reduced when the order's quantity
            // reached zero, so the head contributes nothing
            level.pop_front(0);
            index.evict_if_empty(price);
        }
        self.book.registry.remove(id);
    }

    // ========================================================================
    // Utility Methods
    // ========================================================================

    /// Get the best bid price
    #[inline]
    pub fn best_bid(&self) -> Option<f64> {
        self.book.best_bid()
    }

    /// Get the best ask price
    #[inline]
    pub fn best_ask(&self) -> Option<f64> {
        self.book.best_ask()
    }

    /// Get total active order count
    #[inline]
    pub fn order_count(&self) -> usize {
        self.book.order_count()
    }

    /// Compute a hash of the current state (for determinism testing)
    pub fn state_hash(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        // f64 prices hash by bit pattern
        self.book.best_bid().map(f64::to_bits).hash(&mut hasher);
        self.book.best_ask().map(f64::to_bits).hash(&mut hasher);
        self.book.order_count().hash(&mut hasher);

        for index in [&self.book.bids, &self.book.asks] {
            for level in index.iter_best_first() {
                level.price().to_bits().hash(&mut hasher);
                level.total_qty().hash(&mut hasher);
                for id in level.iter() {
                    id.hash(&mut hasher);
                }
            }
        }

        hasher.finish()
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}
