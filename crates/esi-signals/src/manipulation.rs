//! Buy-out-and-resell screening over sell depth.

use esi_common::{Fetched, MarketOrder, OrderType};
use esi_market::{EsiClient, EsiError, LookupError, StaticData};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Errors from the manipulation screen.
#[derive(Debug, Error)]
pub enum ManipulationError {
    #[error(transparent)]
    Esi(#[from] EsiError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// A viable buy-out-and-resell step found while walking the book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlipOpportunity {
    /// Price of the first level left on the book after the buy-out.
    pub resale_price: Decimal,
    /// Units acquired across the consumed levels.
    pub units: i64,
    /// ISK spent acquiring them.
    pub spent: Decimal,
    /// Resale value over spend, as a ratio.
    pub margin: Decimal,
    /// Profit if every unit resells at `resale_price`.
    pub total_profit: Decimal,
}

/// Screen result with the item identity resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManipulationOpportunity {
    pub type_id: i32,
    pub type_name: String,
    pub flip: FlipOpportunity,
}

/// Walk an ascending sell book accumulating spend and units; return the
/// FIRST level where the bought units resell at the next level's price for
/// at least `min_margin`, while staying under the `capital` cap.
///
/// This takes the cheapest viable entry, not the most profitable one: later
/// levels are never compared, so a better flip deeper in the book is
/// deliberately left on the table.
pub fn find_flip(
    orders: &[MarketOrder],
    min_margin: Decimal,
    capital: Decimal,
) -> Option<FlipOpportunity> {
    let mut spent = Decimal::ZERO;
    let mut units: i64 = 0;

    for window in orders.windows(2) {
        if spent >= capital {
            break;
        }
        let (level, next) = (&window[0], &window[1]);
        units += level.volume_remain;
        spent += level.price * Decimal::from(level.volume_remain);
        if spent.is_zero() {
            // zero-volume levels cannot price a margin
            continue;
        }

        let resale = Decimal::from(units) * next.price;
        let margin = resale / spent;
        if spent < capital && margin >= min_margin {
            return Some(FlipOpportunity {
                resale_price: next.price,
                units,
                spent,
                margin,
                total_profit: resale - spent,
            });
        }
    }

    None
}

/// Fetch the sell depth for an item and screen it for a flip.
///
/// `Ok(None)` means no viable entry, including an empty book.
pub async fn manipulation_check(
    client: &EsiClient,
    sde: &StaticData,
    type_id: i32,
    region_id: i32,
    min_margin: Decimal,
    capital: Decimal,
) -> Result<Option<ManipulationOpportunity>, ManipulationError> {
    let depth = client
        .order_depth(type_id, region_id, None, OrderType::Sell)
        .await?;
    let orders = match depth {
        Fetched::Empty => return Ok(None),
        Fetched::Data(orders) => orders,
    };

    let Some(flip) = find_flip(&orders, min_margin, capital) else {
        return Ok(None);
    };

    let type_name = sde.type_name(type_id)?.to_string();
    debug!(type_id, margin = %flip.margin, profit = %flip.total_profit, "Viable flip found");

    Ok(Some(ManipulationOpportunity {
        type_id,
        type_name,
        flip,
    }))
}
