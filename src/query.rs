//! Query Service - Read-only snapshots and per-level enumeration.
//!
//! Everything here is for the external reporting layer; formatting and
//! display stay outside the core.

use serde::Serialize;

use crate::order::{OrderId, Side};
use crate::order_book::OrderBook;
use crate::price_level::PriceLevel;

/// One (price, aggregate quantity) pair in a depth snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LevelSnapshot {
    /// Level price
    pub price: f64,
    /// Aggregate remaining quantity at this price
    pub qty: u64,
}

/// A best-first depth snapshot of both sides.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BookSnapshot {
    /// Bid levels, highest price first
    pub bids: Vec<LevelSnapshot>,
    /// Ask levels, lowest price first
    pub asks: Vec<LevelSnapshot>,
}

impl OrderBook {
    /// Snapshot both sides, best-first, truncated to `depth` levels each.
    ///
    /// # Complexity
    /// O(depth) given O(1) best-level access
    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        let collect = |side: Side| {
            self.side(side)
                .iter_best_first()
                .take(depth)
                .map(|level| LevelSnapshot {
                    price: level.price(),
                    qty: level.total_qty(),
                })
                .collect()
        };
        BookSnapshot {
            bids: collect(Side::Bid),
            asks: collect(Side::Ask),
        }
    }

    /// Enumerate the order ids resting at one price level in FIFO order
    /// (oldest first), or `None` if the level does not exist.
    pub fn level_orders(
        &self,
        side: Side,
        price: f64,
    ) -> Option<impl Iterator<Item = OrderId> + '_> {
        self.side(side).get(price).map(PriceLevel::iter)
    }
}
