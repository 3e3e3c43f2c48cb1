//! Daily market history aggregates.

use esi_common::{Fetched, HistoryPoint};
use thiserror::Error;
use tracing::debug;

use crate::client::{EsiClient, EsiError};

/// ESI serves at most this many days of history per item.
pub const MAX_HISTORY_DAYS: u16 = 400;

/// Errors from history queries.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Day counts must be in 1..=400; checked before any request is issued.
    #[error("invalid day count {0}: must be between 1 and {MAX_HISTORY_DAYS}")]
    InvalidDays(u16),

    #[error(transparent)]
    Esi(#[from] EsiError),
}

impl EsiClient {
    /// Market history for an item in a region, oldest day first.
    ///
    /// Returns the most recent `days` entries (1..=400). Items that have
    /// never traded come back as `Fetched::Empty`.
    pub async fn market_history(
        &self,
        type_id: i32,
        region_id: i32,
        days: u16,
    ) -> Result<Fetched<HistoryPoint>, HistoryError> {
        if days == 0 || days > MAX_HISTORY_DAYS {
            return Err(HistoryError::InvalidDays(days));
        }

        let url = self.url(
            &format!("markets/{region_id}/history"),
            &[("type_id", type_id.to_string())],
        );
        let fetched: Fetched<HistoryPoint> = self.get_paginated(url, None).await?;
        debug!(type_id, region_id, days, points = fetched.len(), "Fetched market history");

        Ok(match fetched {
            Fetched::Empty => Fetched::Empty,
            Fetched::Data(points) => Fetched::from_records(tail(points, days as usize)),
        })
    }
}

/// Keep the last `days` entries, preserving oldest-first order.
fn tail(mut points: Vec<HistoryPoint>, days: usize) -> Vec<HistoryPoint> {
    if points.len() > days {
        let keep_from = points.len() - days;
        points.split_off(keep_from)
    } else {
        points
    }
}
