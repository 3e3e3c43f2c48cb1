//! Quote the best market price for an item.
//!
//! Usage:
//!   cargo run --example best_price -- --type-id 34
//!   cargo run --example best_price -- --type-id 587 --order-type all --system-id 30000142

use clap::Parser;
use esi_common::{hubs, OrderType};
use esi_market::EsiClient;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "best_price")]
#[command(about = "Quote the best ESI market price for an item")]
struct Args {
    /// Item type id (34 = Tritanium)
    #[arg(long)]
    type_id: i32,

    /// Region to quote from
    #[arg(long, default_value_t = hubs::THE_FORGE)]
    region_id: i32,

    /// Limit orders to one solar system
    #[arg(long)]
    system_id: Option<i32>,

    /// Side of the book: sell, buy or all
    #[arg(long, default_value = "sell")]
    order_type: OrderType,
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

    let quote = client
        .item_price(args.type_id, args.region_id, args.system_id, args.order_type)
        .await?;

    match quote.sell {
        Some(price) => println!("best sell: {price} ISK"),
        None if matches!(args.order_type, OrderType::Sell | OrderType::All) => {
            println!("best sell: no orders")
        }
        None => {}
    }
    match quote.buy {
        Some(price) => println!("best buy:  {price} ISK"),
        None if matches!(args.order_type, OrderType::Buy | OrderType::All) => {
            println!("best buy:  no orders")
        }
        None => {}
    }

    Ok(())
}
