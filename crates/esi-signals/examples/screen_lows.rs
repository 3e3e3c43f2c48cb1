//! Screen a list of items for all-time lows.
//!
//! Usage:
//!   cargo run --example screen_lows -- --type-ids 34,35,36,587
//!   cargo run --example screen_lows -- --type-ids 34,35 --days 90 --threshold 1.1

use clap::Parser;
use esi_common::hubs;
use esi_market::EsiClient;
use esi_signals::{all_time_low, ScreenConfig};
use rust_decimal::Decimal;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "screen_lows")]
#[command(about = "Screen items for all-time-low average prices")]
struct Args {
    /// Comma-separated item type ids to screen
    #[arg(long, value_delimiter = ',')]
    type_ids: Vec<i32>,

    /// Region whose history is screened
    #[arg(long, default_value_t = hubs::THE_FORGE)]
    region_id: i32,

    /// Lookback window in days (1-400)
    #[arg(long, default_value_t = 400)]
    days: u16,

    /// Threshold factor applied to the historical minimum
    #[arg(long, default_value = "1.0")]
    threshold: Decimal,

    /// Cap on concurrent history fetches
    #[arg(long, default_value_t = 8)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let client = EsiClient::with_defaults();
    let config = ScreenConfig {
        region_id: args.region_id,
        lookback_days: args.days,
        threshold: args.threshold,
        concurrency: args.concurrency,
        ..Default::default()
    };

    let lows = all_time_low(&client, &args.type_ids, &config).await?;
    if lows.is_empty() {
        println!("no items at an all-time low");
        return Ok(());
    }

    println!("{:>10} {:>16} {:>16} {:>16}", "type_id", "current_avg", "lowest_avg", "avg_volume");
    for low in lows {
        println!(
            "{:>10} {:>16} {:>16} {:>16.2}",
            low.type_id, low.current_avg, low.lowest_avg, low.avg_volume
        );
    }

    Ok(())
}
