//! Derived trading signals over ESI market data.
//!
//! - `depth`: price a quantity against resting order depth
//! - `manipulation`: buy-out-and-resell screening under a capital cap
//! - `screen`: multi-item all-time-low screening over daily history

pub mod depth;
pub mod manipulation;
pub mod screen;

pub use depth::{fill_cost, quantity_price, DepthError};
pub use manipulation::{
    find_flip, manipulation_check, FlipOpportunity, ManipulationError, ManipulationOpportunity,
};
pub use screen::{
    all_time_low, history_stats, passes_threshold, AllTimeLow, HistoryStats, ResultOrder,
    ScreenConfig, ScreenError,
};
