//! Integration tests for the signal math over realistic book and history
//! fixtures: depth sorted by the market crate, walked and screened here.

use chrono::{NaiveDate, Utc};
use esi_common::{HistoryPoint, MarketOrder, OrderType};
use esi_market::sort_depth;
use esi_signals::{fill_cost, find_flip, history_stats, passes_threshold, DepthError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn order(price: Decimal, volume_remain: i64, is_buy_order: bool) -> MarketOrder {
    MarketOrder {
        order_id: 1,
        type_id: 44992,
        location_id: 60003760,
        system_id: 30000142,
        volume_total: volume_remain,
        volume_remain,
        min_volume: 1,
        price,
        is_buy_order,
        duration: 90,
        issued: Utc::now(),
        range: "region".to_string(),
    }
}

fn day(day: u32, average: Decimal, volume: i64) -> HistoryPoint {
    HistoryPoint {
        date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
        average,
        highest: average * dec!(1.05),
        lowest: average * dec!(0.95),
        order_count: 1500,
        volume,
    }
}

#[test]
fn sorted_sell_depth_walks_cheapest_first() {
    // Book arrives in arbitrary fetch order; sorting puts the cheap volume
    // in front of the walker.
    let mut book = vec![
        order(dec!(4_800_000), 3, false),
        order(dec!(4_500_000), 2, false),
        order(dec!(5_100_000), 10, false),
    ];
    sort_depth(&mut book, OrderType::Sell);

    // 2 @ 4.5m + 3 @ 4.8m + 1 @ 5.1m
    let cost = fill_cost(&book, 6).unwrap();
    assert_eq!(cost, dec!(28_500_000));
}

#[test]
fn sorted_buy_depth_walks_richest_first() {
    let mut book = vec![
        order(dec!(4_000_000), 4, true),
        order(dec!(4_400_000), 1, true),
    ];
    sort_depth(&mut book, OrderType::Buy);

    // 1 @ 4.4m + 2 @ 4.0m
    let proceeds = fill_cost(&book, 3).unwrap();
    assert_eq!(proceeds, dec!(12_400_000));
}

#[test]
fn walking_past_total_depth_reports_what_was_available() {
    let mut book = vec![
        order(dec!(4_800_000), 3, false),
        order(dec!(4_500_000), 2, false),
    ];
    sort_depth(&mut book, OrderType::Sell);

    match fill_cost(&book, 100) {
        Err(DepthError::Unfillable {
            requested,
            available,
        }) => {
            assert_eq!(requested, 100);
            assert_eq!(available, 5);
        }
        other => panic!("expected Unfillable, got {other:?}"),
    }
}

#[test]
fn flip_screen_over_a_thin_book() {
    // A thin book: 40 units near 1m, then a wall at 3m. Buying out the
    // cheap levels and reselling under the wall clears a 1.5 margin.
    let mut book = vec![
        order(dec!(3_000_000), 500, false),
        order(dec!(1_000_000), 25, false),
        order(dec!(1_050_000), 15, false),
    ];
    sort_depth(&mut book, OrderType::Sell);

    let flip = find_flip(&book, dec!(1.5), dec!(100_000_000)).unwrap();
    assert_eq!(flip.resale_price, dec!(3_000_000));
    assert_eq!(flip.units, 40);
    assert_eq!(flip.spent, dec!(40_750_000));
    assert_eq!(flip.total_profit, dec!(79_250_000));
}

#[test]
fn screen_keeps_items_at_their_floor_and_drops_the_rest() {
    let at_floor = vec![
        day(1, dec!(120), 10_000),
        day(2, dec!(100), 12_000),
        day(3, dec!(100), 9_000),
    ];
    let stats = history_stats(&at_floor).unwrap();
    assert!(passes_threshold(&stats, dec!(1.0)));

    let off_floor = vec![
        day(1, dec!(120), 10_000),
        day(2, dec!(90), 12_000),
        day(3, dec!(100), 9_000),
    ];
    let stats = history_stats(&off_floor).unwrap();
    assert!(!passes_threshold(&stats, dec!(1.0)));
}
