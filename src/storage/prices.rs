//! `.prices` text format
//!
//! ```text
//! # comment
//! @ SOL/Abraham Lincoln
//!    + Chemicals
//!       Hydrogen Fuel      95     102
//!       Mineral Oil       143     160
//! ```
//!
//! `@` opens a station block, `+` category lines are informational and
//! item rows end with two integers: the sell and buy price.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricesError {
    #[error("line {line}: item row before any '@ station' line")]
    NoStation { line: usize },

    #[error("line {line}: empty station name")]
    EmptyStation { line: usize },

    #[error("line {line}: expected '<item> <sell> <buy>', got '{text}'")]
    Malformed { line: usize, text: String },

    #[error("line {line}: invalid price '{value}'")]
    InvalidPrice { line: usize, value: String },
}

/// One price row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRecord {
    pub station: String,
    pub item: String,
    pub sell: i64,
    pub buy: i64,
}

fn parse_price(line: usize, value: &str) -> Result<i64, PricesError> {
    value.parse::<i64>().map_err(|_| PricesError::InvalidPrice {
        line,
        value: value.to_string(),
    })
}

/// Parses `.prices` text into records
pub fn parse_prices(text: &str) -> Result<Vec<PriceRecord>, PricesError> {
    let mut records = Vec::new();
    let mut station: Option<String> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('+') {
            continue;
        }

        if let Some(name) = trimmed.strip_prefix('@') {
            let name = name.trim();
            if name.is_empty() {
                return Err(PricesError::EmptyStation { line });
            }
            station = Some(name.to_string());
            continue;
        }

        let station = station.as_ref().ok_or(PricesError::NoStation { line })?;

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(PricesError::Malformed {
                line,
                text: trimmed.to_string(),
            });
        }

        let (name, prices) = fields.split_at(fields.len() - 2);
        records.push(PriceRecord {
            station: station.clone(),
            item: name.join(" "),
            sell: parse_price(line, prices[0])?,
            buy: parse_price(line, prices[1])?,
        });
    }

    Ok(records)
}

/// Reads and parses a `.prices` file
pub fn read_prices_file(path: &Path) -> anyhow::Result<Vec<PriceRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read prices file: {}", path.display()))?;

    parse_prices(&text).with_context(|| format!("Invalid prices file: {}", path.display()))
}
