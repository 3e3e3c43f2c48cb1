//! Market data types mirroring the ESI wire schema.
//!
//! CRITICAL: All ISK amounts use `rust_decimal::Decimal`.
//! NEVER use f64 for price math.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which side of the book an operation targets.
///
/// Mirrors the ESI `order_type` query parameter; anything outside this set
/// fails at parse time, before a request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Sell,
    Buy,
    All,
}

impl OrderType {
    /// Value of the ESI `order_type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Sell => "sell",
            OrderType::Buy => "buy",
            OrderType::All => "all",
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sell" => Ok(OrderType::Sell),
            "buy" => Ok(OrderType::Buy),
            "all" => Ok(OrderType::All),
            _ => Err(format!(
                "invalid order type '{}' (expected 'sell', 'buy' or 'all')",
                s
            )),
        }
    }
}

/// A single resting order from a region or structure order book.
///
/// Immutable snapshot; a fresh set is fetched per query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOrder {
    pub order_id: i64,
    pub type_id: i32,
    /// Station or structure the order was placed at.
    pub location_id: i64,
    pub system_id: i32,
    pub volume_total: i64,
    pub volume_remain: i64,
    pub min_volume: i64,
    pub price: Decimal,
    pub is_buy_order: bool,
    /// Order lifetime in days.
    pub duration: i32,
    pub issued: DateTime<Utc>,
    /// Order range ("station", "region", "solarsystem" or a jump count).
    pub range: String,
}

/// One day of market history for an item in a region.
///
/// ESI serves these oldest-first; consumers rely on that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub average: Decimal,
    pub highest: Decimal,
    pub lowest: Decimal,
    pub order_count: i64,
    pub volume: i64,
}

/// Best-price quote for an item in a region.
///
/// Only the sides that were requested are populated; `None` on a requested
/// side means the book had no matching orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPrice {
    pub type_id: i32,
    /// Lowest ask on the book.
    pub sell: Option<Decimal>,
    /// Highest bid on the book.
    pub buy: Option<Decimal>,
}

/// Region and system ids for the major trade hubs.
pub mod hubs {
    /// The Forge, the default market region (Jita's region).
    pub const THE_FORGE: i32 = 10000002;
    /// Domain (Amarr).
    pub const DOMAIN: i32 = 10000043;
    /// Sinq Laison (Dodixie).
    pub const SINQ_LAISON: i32 = 10000032;
    /// Metropolis (Hek).
    pub const METROPOLIS: i32 = 10000042;
    /// Heimatar (Rens).
    pub const HEIMATAR: i32 = 10000030;

    pub const JITA: i32 = 30000142;
    pub const AMARR: i32 = 30002187;
    pub const DODIXIE: i32 = 30002659;
    pub const HEK: i32 = 30002053;
    pub const RENS: i32 = 30002510;
}
