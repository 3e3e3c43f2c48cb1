//! Market order queries: best price, sorted depth, structure orders.

use esi_common::{Fetched, ItemPrice, MarketOrder, OrderType};
use tracing::debug;

use crate::client::{EsiClient, EsiError};

impl EsiClient {
    /// Best market price for an item in a region.
    ///
    /// `Sell` fills `sell` with the lowest ask, `Buy` fills `buy` with the
    /// highest bid, `All` fills both. A requested side left at `None` means
    /// the book had no matching orders.
    pub async fn item_price(
        &self,
        type_id: i32,
        region_id: i32,
        system_id: Option<i32>,
        order_type: OrderType,
    ) -> Result<ItemPrice, EsiError> {
        let orders = self
            .region_orders(type_id, region_id, system_id, order_type)
            .await?;
        Ok(best_prices(type_id, orders.records(), order_type))
    }

    /// Full order depth for an item in a region.
    ///
    /// Sell books come back sorted ascending by price, buy books descending,
    /// `All` in fetch order. An empty book is `Fetched::Empty`, not an error.
    pub async fn order_depth(
        &self,
        type_id: i32,
        region_id: i32,
        system_id: Option<i32>,
        order_type: OrderType,
    ) -> Result<Fetched<MarketOrder>, EsiError> {
        let fetched = self
            .region_orders(type_id, region_id, system_id, order_type)
            .await?;
        Ok(match fetched {
            Fetched::Empty => Fetched::Empty,
            Fetched::Data(mut orders) => {
                sort_depth(&mut orders, order_type);
                debug!(type_id, region_id, orders = orders.len(), "Fetched order depth");
                Fetched::Data(orders)
            }
        })
    }

    /// All market orders placed in a player structure (authenticated).
    pub async fn structure_orders(
        &self,
        access_token: &str,
        structure_id: i64,
    ) -> Result<Fetched<MarketOrder>, EsiError> {
        let url = self.url(&format!("markets/structures/{structure_id}"), &[]);
        self.get_paginated(url, Some(access_token.to_string())).await
    }

    /// Raw region order fetch with the optional system filter applied.
    async fn region_orders(
        &self,
        type_id: i32,
        region_id: i32,
        system_id: Option<i32>,
        order_type: OrderType,
    ) -> Result<Fetched<MarketOrder>, EsiError> {
        let url = self.url(
            &format!("markets/{region_id}/orders"),
            &[
                ("order_type", order_type.as_str().to_string()),
                ("type_id", type_id.to_string()),
            ],
        );
        let fetched: Fetched<MarketOrder> = self.get_paginated(url, None).await?;
        Ok(match system_id {
            None => fetched,
            Some(system_id) => Fetched::from_records(
                fetched
                    .into_records()
                    .into_iter()
                    .filter(|order| order.system_id == system_id)
                    .collect(),
            ),
        })
    }
}

/// Reduce a book to its best prices for the requested side(s).
pub fn best_prices(type_id: i32, orders: &[MarketOrder], order_type: OrderType) -> ItemPrice {
    let sell = matches!(order_type, OrderType::Sell | OrderType::All)
        .then(|| {
            orders
                .iter()
                .filter(|order| !order.is_buy_order)
                .map(|order| order.price)
                .min()
        })
        .flatten();
    let buy = matches!(order_type, OrderType::Buy | OrderType::All)
        .then(|| {
            orders
                .iter()
                .filter(|order| order.is_buy_order)
                .map(|order| order.price)
                .max()
        })
        .flatten();

    ItemPrice { type_id, sell, buy }
}

/// Sort a book the way its side is consumed: sells ascending, buys
/// descending. `All` books are left as fetched.
pub fn sort_depth(orders: &mut [MarketOrder], order_type: OrderType) {
    match order_type {
        OrderType::Sell => orders.sort_by(|a, b| a.price.cmp(&b.price)),
        OrderType::Buy => orders.sort_by(|a, b| b.price.cmp(&a.price)),
        OrderType::All => {}
    }
}
