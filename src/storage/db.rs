//! SQLite price catalog
//!
//! Holds the latest sell/buy price per station and item. Imports replace
//! existing rows for the same `(station, item)` pair.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use thiserror::Error;

use super::prices::PriceRecord;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A stored price with its import time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredPrice {
    pub station: String,
    pub item: String,
    pub sell: i64,
    pub buy: i64,
    pub updated_at: String,
}

/// The price catalog
pub struct TradeDb {
    /// Database file, `None` when in memory
    path: Option<PathBuf>,

    conn: Connection,
}

impl TradeDb {
    /// Schema version - bump when schema changes to force rebuild
    const SCHEMA_VERSION: i32 = 1;

    /// Opens or creates the catalog at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(DbError::from)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open price database: {}", path.display()))?;

        let db = Self {
            path: Some(path.to_path_buf()),
            conn,
        };
        db.ensure_schema()?;

        Ok(db)
    }

    /// Opens a throwaway in-memory catalog
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;

        let db = Self { path: None, conn };
        db.ensure_schema()?;

        Ok(db)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn ensure_schema(&self) -> Result<()> {
        let version: i32 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .optional()
            .map_err(DbError::from)?
            .unwrap_or(0);

        if version != Self::SCHEMA_VERSION {
            self.conn
                .execute_batch(
                    "
                    DROP TABLE IF EXISTS prices;

                    CREATE TABLE prices (
                        station TEXT NOT NULL,
                        item TEXT NOT NULL,
                        sell INTEGER NOT NULL,
                        buy INTEGER NOT NULL,
                        updated_at TEXT NOT NULL,
                        PRIMARY KEY (station, item)
                    );

                    CREATE INDEX idx_prices_item ON prices(item);
                    ",
                )
                .map_err(DbError::from)?;

            self.conn
                .pragma_update(None, "user_version", Self::SCHEMA_VERSION)
                .map_err(DbError::from)?;
        }

        Ok(())
    }

    /// Upserts records in a single transaction
    ///
    /// Returns the number of distinct `(station, item)` prices written. A
    /// pair repeated within `records` keeps its last price and counts once.
    pub fn import_records(&self, records: &[PriceRecord]) -> Result<usize> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to start import transaction")?;
        let now = Utc::now().to_rfc3339();

        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO prices (station, item, sell, buy, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;

            for record in records {
                stmt.execute(params![
                    record.station,
                    record.item,
                    record.sell,
                    record.buy,
                    now
                ])?;
            }
        }

        tx.commit().context("Failed to commit imported prices")?;

        let distinct: HashSet<(&str, &str)> = records
            .iter()
            .map(|r| (r.station.as_str(), r.item.as_str()))
            .collect();
        Ok(distinct.len())
    }

    /// Number of stored prices
    pub fn price_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM prices", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of stations with at least one price
    pub fn station_count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT station) FROM prices",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Stored prices, optionally limited to one station
    pub fn prices(&self, station: Option<&str>) -> Result<Vec<StoredPrice>> {
        let mut stmt = self.conn.prepare(
            "SELECT station, item, sell, buy, updated_at FROM prices
             WHERE ?1 IS NULL OR station = ?1
             ORDER BY station, item",
        )?;

        let rows = stmt.query_map(params![station], |row| {
            Ok(StoredPrice {
                station: row.get(0)?,
                item: row.get(1)?,
                sell: row.get(2)?,
                buy: row.get(3)?,
                updated_at: row.get(4)?,
            })
        })?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read prices")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(station: &str, item: &str, sell: i64, buy: i64) -> PriceRecord {
        PriceRecord {
            station: station.to_string(),
            item: item.to_string(),
            sell,
            buy,
        }
    }

    #[test]
    fn empty_catalog() {
        let db = TradeDb::open_in_memory().unwrap();

        assert_eq!(db.price_count().unwrap(), 0);
        assert_eq!(db.station_count().unwrap(), 0);
        assert!(db.path().is_none());
    }

    #[test]
    fn import_and_query() {
        let db = TradeDb::open_in_memory().unwrap();
        let imported = db
            .import_records(&[
                record("A", "Gold", 9100, 9350),
                record("A", "Tea", 1400, 1500),
                record("B", "Gold", 9000, 9200),
            ])
            .unwrap();

        assert_eq!(imported, 3);
        assert_eq!(db.price_count().unwrap(), 3);
        assert_eq!(db.station_count().unwrap(), 2);

        let at_a = db.prices(Some("A")).unwrap();
        assert_eq!(at_a.len(), 2);
        assert_eq!(at_a[0].item, "Gold");
        assert_eq!(at_a[1].item, "Tea");
    }

    #[test]
    fn reimport_replaces_price() {
        let db = TradeDb::open_in_memory().unwrap();
        db.import_records(&[record("A", "Gold", 1, 2)]).unwrap();
        db.import_records(&[record("A", "Gold", 3, 4)]).unwrap();

        let prices = db.prices(None).unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!((prices[0].sell, prices[0].buy), (3, 4));
    }

    #[test]
    fn repeated_pair_counts_once() {
        let db = TradeDb::open_in_memory().unwrap();
        let imported = db
            .import_records(&[
                record("A", "Gold", 1, 2),
                record("A", "Tea", 5, 6),
                record("A", "Gold", 3, 4),
            ])
            .unwrap();

        assert_eq!(imported, 2);
        assert_eq!(db.price_count().unwrap(), 2);
        let gold = &db.prices(Some("A")).unwrap()[0];
        assert_eq!((gold.sell, gold.buy), (3, 4));
    }

    #[test]
    fn persists_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prices.db");

        {
            let db = TradeDb::open(&path).unwrap();
            db.import_records(&[record("A", "Gold", 1, 2)]).unwrap();
        }

        let db = TradeDb::open(&path).unwrap();
        assert_eq!(db.price_count().unwrap(), 1);
        assert_eq!(db.path(), Some(path.as_path()));
    }
}
