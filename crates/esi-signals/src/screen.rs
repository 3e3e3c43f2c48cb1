//! All-time-low screening across many items.
//!
//! Fans history fetches out through a bounded worker pool, barriers on the
//! whole batch, and keeps items whose latest daily average sits at (or
//! under) their historical minimum scaled by a threshold.

use std::sync::Arc;

use esi_common::{hubs, Fetched, HistoryPoint};
use esi_market::{EsiClient, HistoryError};
use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Errors from the all-time-low screen.
#[derive(Debug, Error)]
pub enum ScreenError {
    /// The worker cap must allow at least one fetch.
    #[error("concurrency cap must be at least 1")]
    InvalidConcurrency,

    #[error(transparent)]
    History(#[from] HistoryError),
}

/// How the screen orders its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultOrder {
    /// Results follow the input id order (deterministic).
    #[default]
    Input,
    /// Results arrive as their fetches complete.
    Completion,
}

/// Configuration for the all-time-low screen.
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    /// Region whose history is screened.
    pub region_id: i32,
    /// Lookback window in days (1..=400).
    pub lookback_days: u16,
    /// `lowest_avg` is scaled by this before the comparison; 1.0 keeps only
    /// items exactly at (or below) their minimum, higher values widen the
    /// net.
    pub threshold: Decimal,
    /// Fixed cap on concurrent history fetches, independent of input size.
    pub concurrency: usize,
    /// Result ordering.
    pub order: ResultOrder,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            region_id: hubs::THE_FORGE,
            lookback_days: 400,
            threshold: Decimal::ONE,
            concurrency: 8,
            order: ResultOrder::Input,
        }
    }
}

/// Reduction of one item's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStats {
    /// Most recent daily average.
    pub current_avg: Decimal,
    /// Lowest daily average in the window.
    pub lowest_avg: Decimal,
    /// Mean daily volume over the window.
    pub avg_volume: Decimal,
}

/// An item passing the all-time-low comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllTimeLow {
    pub type_id: i32,
    pub current_avg: Decimal,
    pub lowest_avg: Decimal,
    pub avg_volume: Decimal,
}

/// Reduce a history window to the figures the screen compares.
/// `None` for an empty window.
pub fn history_stats(points: &[HistoryPoint]) -> Option<HistoryStats> {
    let last = points.last()?;
    let lowest = points.iter().map(|point| point.average).min()?;
    let total_volume: i64 = points.iter().map(|point| point.volume).sum();
    let avg_volume = Decimal::from(total_volume) / Decimal::from(points.len() as u64);

    Some(HistoryStats {
        current_avg: last.average,
        lowest_avg: lowest,
        avg_volume,
    })
}

/// Whether an item currently counts as an all-time low.
pub fn passes_threshold(stats: &HistoryStats, threshold: Decimal) -> bool {
    stats.current_avg <= stats.lowest_avg * threshold
}

/// Screen `type_ids` for items trading at an all-time low.
///
/// Every id is fetched through a worker pool capped at `config.concurrency`;
/// the whole batch completes before the function returns, and any fetch
/// failure fails the batch. Items with no history are skipped with a
/// warning.
pub async fn all_time_low(
    client: &EsiClient,
    type_ids: &[i32],
    config: &ScreenConfig,
) -> Result<Vec<AllTimeLow>, ScreenError> {
    if config.concurrency == 0 {
        return Err(ScreenError::InvalidConcurrency);
    }

    let semaphore = Arc::new(Semaphore::new(config.concurrency));
    let fetches = type_ids.iter().map(|&type_id| {
        let semaphore = Arc::clone(&semaphore);
        async move {
            let _permit = semaphore.acquire().await.unwrap();
            let history = client
                .market_history(type_id, config.region_id, config.lookback_days)
                .await?;
            Ok::<(i32, Fetched<HistoryPoint>), HistoryError>((type_id, history))
        }
    });

    let results = match config.order {
        ResultOrder::Input => join_all(fetches).await,
        ResultOrder::Completion => {
            let mut pending: FuturesUnordered<_> = fetches.collect();
            let mut completed = Vec::with_capacity(type_ids.len());
            while let Some(result) = pending.next().await {
                completed.push(result);
            }
            completed
        }
    };

    let mut lows = Vec::new();
    for result in results {
        let (type_id, history) = result?;
        let points = history.into_records();
        let Some(stats) = history_stats(&points) else {
            warn!(type_id, "No market history, skipping");
            continue;
        };

        debug!(
            type_id,
            current = %stats.current_avg,
            floor = %(stats.lowest_avg * config.threshold),
            "Screen comparison"
        );
        if passes_threshold(&stats, config.threshold) {
            lows.push(AllTimeLow {
                type_id,
                current_avg: stats.current_avg,
                lowest_avg: stats.lowest_avg,
                avg_volume: stats.avg_volume,
            });
        }
    }

    debug!(screened = type_ids.len(), passed = lows.len(), "Screen complete");
    Ok(lows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn point(day: u32, average: Decimal, volume: i64) -> HistoryPoint {
        HistoryPoint {
            date: NaiveDate::from_ymd_opt(2025, 7, day).unwrap(),
            average,
            highest: average,
            lowest: average,
            order_count: 100,
            volume,
        }
    }

    #[test]
    fn test_history_stats() {
        let window = vec![
            point(1, dec!(120), 1_000),
            point(2, dec!(90), 3_000),
            point(3, dec!(100), 2_000),
        ];
        let stats = history_stats(&window).unwrap();
        assert_eq!(stats.current_avg, dec!(100));
        assert_eq!(stats.lowest_avg, dec!(90));
        assert_eq!(stats.avg_volume, dec!(2000));
    }

    #[test]
    fn test_history_stats_empty_window() {
        assert!(history_stats(&[]).is_none());
    }

    #[test]
    fn test_threshold_boundary() {
        // current == lowest at threshold 1.0 is still a low
        let at_floor = HistoryStats {
            current_avg: dec!(100),
            lowest_avg: dec!(100),
            avg_volume: dec!(1),
        };
        assert!(passes_threshold(&at_floor, dec!(1.0)));

        // 100 > 90 * 1.0 is not
        let above_floor = HistoryStats {
            current_avg: dec!(100),
            lowest_avg: dec!(90),
            avg_volume: dec!(1),
        };
        assert!(!passes_threshold(&above_floor, dec!(1.0)));

        // a wider threshold lets it back in: 100 <= 90 * 1.2
        assert!(passes_threshold(&above_floor, dec!(1.2)));
    }

    #[test]
    fn test_default_config() {
        let config = ScreenConfig::default();
        assert_eq!(config.region_id, hubs::THE_FORGE);
        assert_eq!(config.lookback_days, 400);
        assert_eq!(config.threshold, Decimal::ONE);
        assert_eq!(config.order, ResultOrder::Input);
    }

    #[tokio::test]
    async fn test_zero_concurrency_rejected_before_any_request() {
        let client = EsiClient::with_defaults();
        let config = ScreenConfig {
            concurrency: 0,
            ..Default::default()
        };
        let result = all_time_low(&client, &[34, 35], &config).await;
        assert!(matches!(result, Err(ScreenError::InvalidConcurrency)));
    }
}
