//! Order-book walking: price a quantity against resting depth.

use esi_common::{Fetched, MarketOrder, OrderType};
use esi_market::{EsiClient, EsiError};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from pricing a quantity against a book.
#[derive(Debug, Error)]
pub enum DepthError {
    /// Requested quantity exceeds the volume resting on the book.
    #[error("order cannot be filled: requested {requested}, available {available}")]
    Unfillable { requested: i64, available: i64 },

    /// Quantities must be positive; checked before any request is issued.
    #[error("invalid quantity {0}: must be at least 1")]
    InvalidQuantity(i64),

    /// An `all` book mixes both sides and has no walk direction.
    #[error("order type 'all' has no walk direction; use 'sell' or 'buy'")]
    AmbiguousSide,

    /// The book had no orders at all.
    #[error("no orders on the book")]
    NoOrders,

    #[error(transparent)]
    Esi(#[from] EsiError),
}

/// Cost of filling `quantity` units against a price-sorted book.
///
/// Orders are consumed front to back, so pass sell books sorted ascending
/// and buy books sorted descending, the order [`EsiClient::order_depth`]
/// returns them in. The walk is exact decimal arithmetic: whole orders are
/// consumed until the last one, whose contribution is split pro-rata.
pub fn fill_cost(orders: &[MarketOrder], quantity: i64) -> Result<Decimal, DepthError> {
    if quantity < 1 {
        return Err(DepthError::InvalidQuantity(quantity));
    }

    let available: i64 = orders.iter().map(|order| order.volume_remain).sum();
    if quantity > available {
        return Err(DepthError::Unfillable {
            requested: quantity,
            available,
        });
    }

    let mut remaining = quantity;
    let mut cost = Decimal::ZERO;
    for order in orders {
        if remaining <= order.volume_remain {
            cost += order.price * Decimal::from(remaining);
            break;
        }
        cost += order.price * Decimal::from(order.volume_remain);
        remaining -= order.volume_remain;
    }

    Ok(cost)
}

/// Fetch the sorted depth for an item and price `quantity` against it.
///
/// `Sell` prices buying from sell orders, `Buy` prices selling into buy
/// orders; `All` is rejected because a mixed book has no walk direction.
pub async fn quantity_price(
    client: &EsiClient,
    type_id: i32,
    quantity: i64,
    region_id: i32,
    system_id: Option<i32>,
    order_type: OrderType,
) -> Result<Decimal, DepthError> {
    if matches!(order_type, OrderType::All) {
        return Err(DepthError::AmbiguousSide);
    }
    if quantity < 1 {
        return Err(DepthError::InvalidQuantity(quantity));
    }

    let depth = client
        .order_depth(type_id, region_id, system_id, order_type)
        .await?;
    match depth {
        Fetched::Empty => Err(DepthError::NoOrders),
        Fetched::Data(orders) => fill_cost(&orders, quantity),
    }
}
