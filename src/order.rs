//! Order and event types shared across the book.
//!
//! Orders are inputs from the submitting client.
//! Trade events are outputs to execution/audit consumers.

use serde::Serialize;
use thiserror::Error;

/// External order identifier, client-assigned and unique while active.
pub type OrderId = u64;

/// Order side (bid = buy, ask = sell)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum Side {
    /// Buy side (bids)
    Bid = 0,
    /// Sell side (asks)
    Ask = 1,
}

impl Side {
    /// Returns the opposite side
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

/// A limit order as submitted by the client.
///
/// `seq` is the arrival sequence assigned by the caller; FIFO position in
/// the level queue is what actually breaks price ties, so the field is
/// informational. `timestamp_ns` is recorded but never compared.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LimitOrder {
    /// External order ID (client-assigned)
    pub id: OrderId,
    /// Order side (bid/ask)
    pub side: Side,
    /// Limit price (floating-point, used as-is)
    pub price: f64,
    /// Remaining quantity (decremented by fills, never negative)
    pub qty: u64,
    /// Monotonic arrival sequence
    pub seq: u64,
    /// Submission timestamp in nanoseconds
    pub timestamp_ns: u64,
}

/// A match between a resting bid and a resting ask.
///
/// Both resting prices are reported; the execution-price convention is left
/// to the consumer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TradeEvent {
    /// Resting bid order that participated
    pub resting_bid_id: OrderId,
    /// Resting ask order that participated
    pub resting_ask_id: OrderId,
    /// Price of the resting bid
    pub bid_price: f64,
    /// Price of the resting ask
    pub ask_price: f64,
    /// Quantity matched
    pub qty: u64,
}

/// Errors reported by book operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    /// The order id is already active in the book
    #[error("order id {0} is already active")]
    DuplicateOrderId(OrderId),
    /// No active order with this id
    #[error("order id {0} not found")]
    UnknownOrderId(OrderId),
    /// An internal invariant no longer holds
    #[error("book state corrupted: {0}")]
    Corrupted(&'static str),
}
