//! Side Index - Ordered price -> level mapping for one side of the book.
//!
//! Prices are raw `f64` (used as-is, no fixed-point conversion), so the
//! `BTreeMap` keys are wrapped in `OrderedFloat` for a total order. Bid
//! best is the maximum key, ask best is the minimum key.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::order::Side;
use crate::price_level::PriceLevel;

/// One side of the book: an ordered mapping from price to its level.
///
/// Each price appears at most once. Empty levels are evicted eagerly so
/// best-price lookup never observes a stale zero-quantity level.
#[derive(Clone, Debug)]
pub struct SideIndex {
    side: Side,
    levels: BTreeMap<OrderedFloat<f64>, PriceLevel>,
}

impl SideIndex {
    /// Create an empty index for the given side
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    /// Which side this index holds
    #[inline]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Get an existing level (immutable)
    #[inline]
    pub fn get(&self, price: f64) -> Option<&PriceLevel> {
        self.levels.get(&OrderedFloat(price))
    }

    /// Get an existing level (mutable)
    #[inline]
    pub fn get_mut(&mut self, price: f64) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&OrderedFloat(price))
    }

    /// Get the level at `price`, inserting a new empty one if absent.
    #[inline]
    pub fn get_or_create(&mut self, price: f64) -> &mut PriceLevel {
        self.levels
            .entry(OrderedFloat(price))
            .or_insert_with(|| PriceLevel::new(price))
    }

    /// Remove the level at `price` if its queue is empty.
    ///
    /// Keeps the index bounded to active price points.
    pub fn evict_if_empty(&mut self, price: f64) {
        let key = OrderedFloat(price);
        if self.levels.get(&key).is_some_and(|level| level.is_empty()) {
            self.levels.remove(&key);
        }
    }

    /// The best level: maximum price for bids, minimum price for asks.
    #[inline]
    pub fn best(&self) -> Option<&PriceLevel> {
        match self.side {
            Side::Bid => self.levels.last_key_value().map(|(_, level)| level),
            Side::Ask => self.levels.first_key_value().map(|(_, level)| level),
        }
    }

    /// The best price, or `None` if the side is empty.
    #[inline]
    pub fn best_price(&self) -> Option<f64> {
        self.best().map(PriceLevel::price)
    }

    /// Full ordered traversal, best level first.
    pub fn iter_best_first(&self) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match self.side {
            Side::Bid => Box::new(self.levels.values().rev()),
            Side::Ask => Box::new(self.levels.values()),
        }
    }

    /// Number of active price levels
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns true if the side has no levels
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
