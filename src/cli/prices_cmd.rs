//! The `prices` command

use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::storage::{Config, TradeDb};

pub fn run(output: &Output, config: &Config, data_dir: &Path, station: Option<&str>) -> Result<()> {
    let db = TradeDb::open(&config.db_path(data_dir))?;
    let prices = db.prices(station)?;

    if output.is_json() {
        output.data(&prices);
        return Ok(());
    }

    if prices.is_empty() {
        println!("No prices in the catalog.");
        return Ok(());
    }

    println!("{:<32} {:<24} {:>8} {:>8}", "STATION", "ITEM", "SELL", "BUY");
    println!("{}", "-".repeat(75));
    for price in &prices {
        println!(
            "{:<32} {:<24} {:>8} {:>8}",
            price.station, price.item, price.sell, price.buy
        );
    }

    Ok(())
}
