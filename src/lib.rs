//! # lob-core
//!
//! A single-instrument limit order book with price-time priority matching.
//!
//! ## Design Principles
//!
//! - **Single-Writer**: One serialized caller owns the book (no locks)
//! - **Centralized Ownership**: The registry is the only owner of order
//!   state; price levels hold ids, never orders
//! - **Invariants First**: After every operation the book is uncrossed and
//!   every level aggregate equals the sum of its orders
//!
//! ## Architecture
//!
//! ```text
//! add/cancel/amend --> [MatchingEngine] --> [OrderBook]
//!                             |                 |-- SideIndex (bids)
//!                       TradeEvents             |-- SideIndex (asks)
//!                                               `-- OrderRegistry
//! ```

pub mod matching;
pub mod order;
pub mod order_book;
pub mod price_level;
pub mod query;
pub mod registry;
pub mod side_index;

// Re-exports for convenience
pub use matching::MatchingEngine;
pub use order::{BookError, LimitOrder, OrderId, Side, TradeEvent};
pub use order_book::OrderBook;
pub use price_level::PriceLevel;
pub use query::{BookSnapshot, LevelSnapshot};
pub use registry::OrderRegistry;
pub use side_index::SideIndex;
