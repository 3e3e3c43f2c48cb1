//! Shared types for the EVE ESI market toolkit.
//!
//! Wire-faithful market records, the closed order-type selector, and the
//! tagged fetch result used across the client and signal crates.

pub mod fetched;
pub mod types;

pub use fetched::Fetched;
pub use types::{hubs, HistoryPoint, ItemPrice, MarketOrder, OrderType};
